//! pom.xml parser.
//!
//! Uses the quick-xml SAX reader to extract the two things transitive
//! resolution needs from a POM: the `<properties>` map and the raw
//! `<project><dependencies>` declarations. Declarations under
//! `<dependencyManagement>`, `<build>`, `<profiles>` and per-dependency
//! `<exclusions>` are ignored.

use crate::error::{MavenError, Result};
use crate::properties::interpolate;
use crate::types::{DEFAULT_PACKAGING, Dependency, MavenScope};
use crate::version::simplify_range;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use std::collections::HashMap;

/// One `<dependency>` element exactly as written, placeholders included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub packaging: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PomDocument {
    pub dependencies: Vec<RawDependency>,
    pub properties: HashMap<String, String>,
}

/// Context stack element for SAX parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseContext {
    Root,
    Project,
    Parent,
    Properties,
    Property(String),
    Dependencies,
    Dependency,
    Field(&'static str),
    Ignored,
}

/// Coordinates of the project itself and of its `<parent>`.
#[derive(Default)]
struct ModelAccum {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    parent_group_id: Option<String>,
    parent_version: Option<String>,
}

const COORDINATE_FIELDS: &[&str] = &["groupId", "artifactId", "version"];
const DEPENDENCY_FIELDS: &[&str] = &[
    "groupId",
    "artifactId",
    "version",
    "classifier",
    "type",
    "scope",
];

fn field_name(tag: &str, allowed: &[&'static str]) -> Option<&'static str> {
    allowed.iter().copied().find(|f| *f == tag)
}

/// Parses raw POM bytes, rejecting non UTF-8 input.
pub fn parse_pom_bytes(bytes: &[u8]) -> Result<PomDocument> {
    let content = std::str::from_utf8(bytes).map_err(|e| MavenError::ParseError {
        message: format!("pom.xml is not valid UTF-8: {e}"),
    })?;
    parse_pom_xml(content.trim_start_matches('\u{feff}'))
}

pub fn parse_pom_xml(content: &str) -> Result<PomDocument> {
    let mut dependencies = Vec::new();
    let mut properties = HashMap::new();
    let mut model = ModelAccum::default();

    // text arrives in chunks split around entity references, so values
    // are trimmed once when their element closes
    let mut reader = Reader::from_str(content);

    let mut context_stack: Vec<ParseContext> = vec![ParseContext::Root];
    let mut current_dep: Option<RawDependency> = None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| MavenError::ParseError {
            message: format!("at byte {}: {e}", reader.error_position()),
        })?;

        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                let ctx = context_stack.last().cloned().unwrap_or(ParseContext::Root);

                let next = match (ctx, tag.as_str()) {
                    (ParseContext::Root, "project") => ParseContext::Project,
                    (ParseContext::Project, "parent") => ParseContext::Parent,
                    (ParseContext::Project, "properties") => ParseContext::Properties,
                    (ParseContext::Project, "dependencies") => ParseContext::Dependencies,
                    (ParseContext::Properties, key) => ParseContext::Property(key.to_string()),
                    (ParseContext::Dependencies, "dependency") => {
                        current_dep = Some(RawDependency::default());
                        ParseContext::Dependency
                    }
                    (ParseContext::Project | ParseContext::Parent, field) => {
                        field_name(field, COORDINATE_FIELDS)
                            .map_or(ParseContext::Ignored, ParseContext::Field)
                    }
                    (ParseContext::Dependency, field) => field_name(field, DEPENDENCY_FIELDS)
                        .map_or(ParseContext::Ignored, ParseContext::Field),
                    _ => ParseContext::Ignored,
                };
                text.clear();
                context_stack.push(next);
            }
            Event::Empty(ref e) => {
                // `<key/>` inside <properties> defines an empty property
                if context_stack.last() == Some(&ParseContext::Properties) {
                    let key = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    properties.insert(key, String::new());
                }
            }
            Event::Text(ref e) => {
                if collects_text(&context_stack) {
                    match e.decode() {
                        Ok(cow) => text.push_str(&cow),
                        Err(_) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
                    }
                }
            }
            Event::GeneralRef(ref e) => {
                if collects_text(&context_stack) {
                    let name = String::from_utf8_lossy(e).to_string();
                    match e.resolve_char_ref() {
                        Ok(Some(ch)) => text.push(ch),
                        Ok(None) => match resolve_predefined_entity(&name) {
                            Some(resolved) => text.push_str(resolved),
                            None => {
                                return Err(MavenError::ParseError {
                                    message: format!("unknown entity reference &{name};"),
                                });
                            }
                        },
                        Err(err) => {
                            return Err(MavenError::ParseError {
                                message: format!("invalid character reference &{name};: {err}"),
                            });
                        }
                    }
                }
            }
            Event::CData(ref e) => {
                if collects_text(&context_stack) {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if context_stack.len() <= 1 {
                    continue;
                }
                let Some(closed) = context_stack.pop() else {
                    continue;
                };
                let parent = context_stack.last().cloned().unwrap_or(ParseContext::Root);

                match closed {
                    ParseContext::Field(field) => {
                        let value = take_trimmed(&mut text);
                        match parent {
                            ParseContext::Dependency => {
                                if let Some(dep) = current_dep.as_mut() {
                                    assign_dependency_field(dep, field, value);
                                }
                            }
                            ParseContext::Project => match field {
                                "groupId" => model.group_id = Some(value),
                                "artifactId" => model.artifact_id = Some(value),
                                "version" => model.version = Some(value),
                                _ => {}
                            },
                            ParseContext::Parent => match field {
                                "groupId" => model.parent_group_id = Some(value),
                                "version" => model.parent_version = Some(value),
                                _ => {}
                            },
                            _ => {}
                        }
                    }
                    ParseContext::Property(key) => {
                        properties.insert(key, take_trimmed(&mut text));
                    }
                    ParseContext::Dependency => {
                        if let Some(dep) = current_dep.take() {
                            dependencies.push(dep);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if context_stack.len() > 1 {
        return Err(MavenError::ParseError {
            message: "unexpected end of document".into(),
        });
    }

    add_model_properties(&mut properties, model);

    Ok(PomDocument {
        dependencies,
        properties,
    })
}

fn collects_text(context_stack: &[ParseContext]) -> bool {
    matches!(
        context_stack.last(),
        Some(ParseContext::Field(_) | ParseContext::Property(_))
    )
}

fn take_trimmed(text: &mut String) -> String {
    let value = text.trim().to_string();
    text.clear();
    value
}

fn assign_dependency_field(dep: &mut RawDependency, field: &str, value: String) {
    match field {
        "groupId" => dep.group_id = Some(value),
        "artifactId" => dep.artifact_id = Some(value),
        "version" => dep.version = Some(value),
        "classifier" => dep.classifier = Some(value),
        "type" => dep.packaging = Some(value),
        "scope" => dep.scope = Some(value),
        _ => {}
    }
}

/// Exposes the project coordinates as `project.*` / `pom.*` properties
/// unless the POM defines those keys itself. Group and version fall back
/// to the `<parent>` values, mirroring Maven inheritance.
fn add_model_properties(properties: &mut HashMap<String, String>, model: ModelAccum) {
    let group_id = model.group_id.or_else(|| model.parent_group_id.clone());
    let version = model.version.or_else(|| model.parent_version.clone());

    let entries = [
        ("groupId", group_id),
        ("artifactId", model.artifact_id),
        ("version", version),
        ("parent.groupId", model.parent_group_id),
        ("parent.version", model.parent_version),
    ];

    for (suffix, value) in entries {
        let Some(value) = value else { continue };
        for prefix in ["project", "pom"] {
            properties
                .entry(format!("{prefix}.{suffix}"))
                .or_insert_with(|| value.clone());
        }
    }
}

impl RawDependency {
    /// Turns the declaration into a coordinate, or `None` when it does not
    /// participate in transitive resolution.
    ///
    /// Placeholders are resolved against `properties`, version ranges are
    /// reduced to their last bound, and declarations whose scope is neither
    /// empty, `compile` nor `provided` are dropped, as are declarations whose
    /// group, artifact or version ends up empty.
    pub fn resolve(&self, properties: &HashMap<String, String>) -> Option<Dependency> {
        let value = |field: &Option<String>| field.as_deref().map(|v| interpolate(v, properties));

        let scope = value(&self.scope).unwrap_or_default();
        if !scope.parse::<MavenScope>().unwrap_or_default().is_transitive() {
            return None;
        }

        let group_id = value(&self.group_id).filter(|v| !v.is_empty())?;
        let artifact_id = value(&self.artifact_id).filter(|v| !v.is_empty())?;
        let version = value(&self.version)
            .map(|v| simplify_range(&v))
            .filter(|v| !v.is_empty())?;

        let classifier = value(&self.classifier).unwrap_or_default();
        let packaging = value(&self.packaging)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PACKAGING.to_string());

        Some(
            Dependency::new(group_id, artifact_id, version)
                .with_classifier(classifier)
                .with_packaging(packaging),
        )
    }
}

impl PomDocument {
    /// Declarations that survive [`RawDependency::resolve`], in document order.
    pub fn resolved_dependencies(&self) -> Vec<Dependency> {
        self.dependencies
            .iter()
            .filter_map(|raw| {
                let resolved = raw.resolve(&self.properties);
                if resolved.is_none() {
                    tracing::debug!("skipping dependency declaration {:?}", raw);
                }
                resolved
            })
            .collect()
    }
}
