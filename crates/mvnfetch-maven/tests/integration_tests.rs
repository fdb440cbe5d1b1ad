//! Integration tests using fixture files and mock HTTP repositories.

use mvnfetch_core::HttpTransport;
use mvnfetch_maven::{
    Dependency, MavenError, MavenRepository, RawDependency, Repository, parse_pom_xml,
    sha512_hex,
};
use std::path::Path;
use std::sync::Arc;

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {name}: {e}"))
}

fn notations(deps: &[Dependency]) -> Vec<String> {
    deps.iter().map(ToString::to_string).collect()
}

#[test]
fn test_fixture_simple_pom() {
    let result = parse_pom_xml(&load_fixture("simple_pom.xml")).unwrap();
    assert_eq!(result.dependencies.len(), 2);
    assert_eq!(
        notations(&result.resolved_dependencies()),
        ["org.apache.commons:commons-lang3:3.14.0"]
    );
}

#[test]
fn test_fixture_complex_pom() {
    let result = parse_pom_xml(&load_fixture("complex_pom.xml")).unwrap();

    // dependencyManagement, plugins and profiles are not part of the graph
    assert_eq!(result.dependencies.len(), 8);
    assert_eq!(
        result.properties.get("jackson.version").map(String::as_str),
        Some("2.16.0")
    );
    assert_eq!(
        result.properties.get("project.groupId").map(String::as_str),
        Some("org.springframework.boot")
    );

    insta::assert_snapshot!(notations(&result.resolved_dependencies()).join("\n"), @r"
    org.springframework.boot:spring-boot-starter-web:3.2.0
    com.fasterxml.jackson.core:jackson-databind:2.16.0
    org.slf4j:slf4j-api:2.0.9
    org.springframework.boot:complex-core:3.2.0
    jakarta.servlet:jakarta.servlet-api:6.1.0
    org.lwjgl:lwjgl:3.3.3:jar:natives-linux
    ");
}

#[test]
fn test_fixture_minimal_pom() {
    let result = parse_pom_xml(&load_fixture("minimal_pom.xml")).unwrap();
    assert!(result.dependencies.is_empty());
    assert_eq!(
        result.properties.get("project.version").map(String::as_str),
        Some("1.0.0")
    );
}

#[test]
fn test_fixture_property_versions() {
    let result = parse_pom_xml(&load_fixture("property_versions.xml")).unwrap();
    assert_eq!(result.dependencies.len(), 2);
    // raw declarations keep the placeholders
    assert_eq!(
        result.dependencies[0].version.as_deref(),
        Some("${commons.version}")
    );
    assert_eq!(
        notations(&result.resolved_dependencies()),
        [
            "org.apache.commons:commons-lang3:3.14.0",
            "com.google.guava:guava:guava.version",
        ]
    );
}

#[test]
fn test_fixture_scoped_deps() {
    let result = parse_pom_xml(&load_fixture("scoped_deps.xml")).unwrap();
    assert_eq!(result.dependencies.len(), 5);

    let scopes: Vec<_> = result
        .dependencies
        .iter()
        .map(|d: &RawDependency| d.scope.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(scopes, ["compile", "test", "runtime", "provided", "system"]);

    assert_eq!(
        notations(&result.resolved_dependencies()),
        [
            "org.apache.commons:commons-lang3:3.14.0",
            "javax.servlet:javax.servlet-api:4.0.1",
        ]
    );
}

#[test]
fn test_fixture_namespaced_pom() {
    let result = parse_pom_xml(&load_fixture("namespaced_pom.xml")).unwrap();
    assert_eq!(
        notations(&result.resolved_dependencies()),
        ["org.apache.commons:commons-lang3:3.14.0"]
    );
}

#[test]
fn test_fixture_malformed_pom() {
    let result = parse_pom_xml(&load_fixture("malformed_pom.xml"));
    assert!(matches!(result, Err(MavenError::ParseError { .. })));
}

fn lib_pom() -> String {
    r"<project>
  <groupId>com.x</groupId>
  <artifactId>lib</artifactId>
  <version>1.0</version>
  <dependencies>
    <dependency>
      <groupId>com.x</groupId>
      <artifactId>sub</artifactId>
      <version>2.0</version>
    </dependency>
    <dependency>
      <groupId>com.x</groupId>
      <artifactId>testlib</artifactId>
      <version>3.0</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>"
        .to_string()
}

#[tokio::test]
async fn test_end_to_end_with_fallback_repositories() {
    let mut remote_a = mockito::Server::new_async().await;
    let mut remote_b = mockito::Server::new_async().await;

    let a_any = remote_a
        .mock("GET", mockito::Matcher::Any)
        .with_status(404)
        .expect_at_least(1)
        .create_async()
        .await;
    let b_pom = remote_b
        .mock("GET", "/com/x/lib/1.0/lib-1.0.pom")
        .with_status(200)
        .with_body(lib_pom())
        .expect(1)
        .create_async()
        .await;
    let b_jar = remote_b
        .mock("GET", "/com/x/lib/1.0/lib-1.0.jar")
        .with_status(200)
        .with_body("lib jar")
        .expect(1)
        .create_async()
        .await;
    let b_sub_pom = remote_b
        .mock("GET", "/com/x/sub/2.0/sub-2.0.pom")
        .with_status(200)
        .with_body("<project><artifactId>sub</artifactId></project>")
        .expect(1)
        .create_async()
        .await;

    // a pre-populated local repository provides the sub jar
    let local_repo = tempfile::tempdir().unwrap();
    let sub_dir = local_repo.path().join("com").join("x").join("sub").join("2.0");
    std::fs::create_dir_all(&sub_dir).unwrap();
    std::fs::write(sub_dir.join("sub-2.0.jar"), b"sub jar").unwrap();

    let cache = tempfile::tempdir().unwrap();
    let mut maven = MavenRepository::new();
    maven
        .add_repository(Repository::local("local", local_repo.path()))
        .add_repository(Repository::remote("a", remote_a.url()))
        .add_repository(Repository::remote("b", remote_b.url()))
        .add_dependency(Dependency::parse("com.x:lib:1.0").unwrap());

    let transport = Arc::new(HttpTransport::new().unwrap());
    let fetcher = maven.new_fetcher(cache.path(), transport);

    let artifacts = fetcher.download_all_dependencies().await.unwrap();
    let planned: Vec<_> = artifacts
        .iter()
        .map(|a| a.dependency.to_string())
        .collect();
    assert_eq!(planned, ["com.x:lib:1.0", "com.x:sub:2.0"]);

    let lib = artifacts[0].path.as_ref().unwrap();
    let sub = artifacts[1].path.as_ref().unwrap();
    assert!(lib.starts_with(cache.path()));
    assert_eq!(std::fs::read(lib).unwrap(), b"lib jar");
    assert_eq!(std::fs::read(sub).unwrap(), b"sub jar");

    // a second run inside the freshness window stays offline
    let again = fetcher.download_all_dependencies().await.unwrap();
    assert!(again.iter().all(|a| a.path.is_some()));

    a_any.assert_async().await;
    b_pom.assert_async().await;
    b_jar.assert_async().await;
    b_sub_pom.assert_async().await;
}

#[tokio::test]
async fn test_end_to_end_rejects_tampered_artifact() {
    let mut remote = mockito::Server::new_async().await;
    remote
        .mock("GET", "/org/example/signed/1.0/signed-1.0.pom")
        .with_status(200)
        .with_body("<project/>")
        .create_async()
        .await;
    remote
        .mock("GET", "/org/example/signed/1.0/signed-1.0.jar")
        .with_status(200)
        .with_body("tampered")
        .create_async()
        .await;

    let cache = tempfile::tempdir().unwrap();
    let root = Dependency::parse("org.example:signed:1.0")
        .unwrap()
        .with_sha512(Some(sha512_hex(b"genuine")));
    let mut maven = MavenRepository::new();
    maven
        .add_repository(Repository::remote("mirror", remote.url()))
        .add_dependency(root.clone());

    let fetcher = maven.new_fetcher(cache.path(), Arc::new(HttpTransport::new().unwrap()));
    let artifacts = fetcher.download_all_dependencies().await.unwrap();

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].dependency, root);
    assert!(artifacts[0].path.is_none());
    assert!(!fetcher.cache().resolve_path(&root).exists());
}
