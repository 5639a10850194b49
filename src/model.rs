use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The whole data document: `{ "projects": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Catalog {
    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Neighbours of `id` in list order, used for prev/next navigation.
    pub fn neighbours(&self, id: &str) -> (Option<&Project>, Option<&Project>) {
        let Some(index) = self.projects.iter().position(|p| p.id == id) else {
            return (None, None);
        };
        let prev = index.checked_sub(1).and_then(|i| self.projects.get(i));
        let next = self.projects.get(index + 1);
        (prev, next)
    }
}

// One portfolio entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub number: Option<Label>,
    #[serde(default, deserialize_with = "text_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub tech_tags: Vec<String>,
    #[serde(default)]
    pub meta: ProjectMeta,
    #[serde(default, deserialize_with = "lenient_sections")]
    pub sections: Option<Vec<Section>>,
}

impl Project {
    /// Sections to render; `None` when the project should fall back to the
    /// generic overview built from its description.
    pub fn content_sections(&self) -> Option<&[Section]> {
        self.sections.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    #[serde(default, deserialize_with = "text")]
    pub role: String,
    #[serde(default, deserialize_with = "text")]
    pub timeline: String,
    #[serde(default, deserialize_with = "text")]
    pub team_size: String,
}

/// Card number, written either as `"01"` or `1` in the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Number(u64),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Text(s) => f.write_str(s),
            Label::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One typed content block of a project page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Section {
    Overview(TextBlock),
    Problem(TextBlock),
    Learnings(TextBlock),
    Technical {
        #[serde(default)]
        heading: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        subsections: Vec<TextBlock>,
    },
    Gallery {
        #[serde(default = "default_gallery_layout")]
        layout: String,
        #[serde(default)]
        images: Vec<Figure>,
    },
    Results {
        #[serde(default)]
        heading: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        metrics: Vec<Metric>,
    },
    FullWidthImage(Figure),
    Video {
        src: String,
        #[serde(default = "default_video_format")]
        format: String,
        #[serde(default)]
        caption: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub src: String,
    #[serde(default, deserialize_with = "text")]
    pub alt: String,
    #[serde(default, deserialize_with = "text")]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, deserialize_with = "text")]
    pub value: String,
    #[serde(default, deserialize_with = "text")]
    pub label: String,
}

fn default_gallery_layout() -> String {
    "grid".to_string()
}

fn default_video_format() -> String {
    "mp4".to_string()
}

// Display fields are interpolated as-is, so `4` and `"4"` both read as "4".
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(serde_json::Value::deserialize(deserializer)?))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().map(scalar_text).collect())
}

fn scalar_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// A malformed section must not take the whole document down with it.
fn lenient_sections<'de, D>(deserializer: D) -> Result<Option<Vec<Section>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|values| {
        values
            .into_iter()
            .map(|value| {
                Section::deserialize(value).unwrap_or_else(|e| {
                    tracing::warn!("Skipping malformed section: {}", e);
                    Section::Unknown
                })
            })
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Catalog {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let catalog = parse(r#"{"projects":[{"id":"a","title":"A"}]}"#);
        let project = &catalog.projects[0];
        assert_eq!(project.thumbnail, None);
        assert!(project.tags.is_empty());
        assert_eq!(project.meta.team_size, "");
        assert!(project.content_sections().is_none());
    }

    #[test]
    fn camel_case_fields_are_read() {
        let catalog = parse(
            r#"{"projects":[{"id":"a","title":"A","techTags":["Rust"],
                "meta":{"role":"Lead","timeline":"2024","teamSize":"3"}}]}"#,
        );
        let project = &catalog.projects[0];
        assert_eq!(project.tech_tags, vec!["Rust".to_string()]);
        assert_eq!(project.meta.team_size, "3");
    }

    #[test]
    fn number_accepts_text_or_integer() {
        let catalog = parse(
            r#"{"projects":[{"id":"a","title":"A","number":"01"},{"id":"b","title":"B","number":2}]}"#,
        );
        assert_eq!(catalog.projects[0].number.as_ref().unwrap().to_string(), "01");
        assert_eq!(catalog.projects[1].number.as_ref().unwrap().to_string(), "2");
    }

    #[test]
    fn sections_decode_by_type_tag() {
        let catalog = parse(
            r#"{"projects":[{"id":"a","title":"A","sections":[
                {"type":"overview","heading":"Why","content":"Because"},
                {"type":"full-width-image","src":"x.png","alt":"X","caption":"c"},
                {"type":"video","src":"v.webm"},
                {"type":"gallery","images":[{"src":"g.png","alt":"G","caption":""}]}
            ]}]}"#,
        );
        let sections = catalog.projects[0].content_sections().unwrap();
        assert_eq!(
            sections[0],
            Section::Overview(TextBlock { heading: "Why".into(), content: "Because".into() })
        );
        assert!(matches!(&sections[1], Section::FullWidthImage(f) if f.src == "x.png"));
        assert!(matches!(&sections[2], Section::Video { format, caption: None, .. } if format == "mp4"));
        assert!(matches!(&sections[3], Section::Gallery { layout, images } if layout == "grid" && images.len() == 1));
    }

    #[test]
    fn unknown_and_malformed_sections_become_unknown() {
        let catalog = parse(
            r#"{"projects":[{"id":"a","title":"A","sections":[
                {"type":"carousel","items":[]},
                {"heading":"no type"},
                {"type":"video"}
            ]}]}"#,
        );
        let sections = catalog.projects[0].sections.as_ref().unwrap();
        assert_eq!(sections, &vec![Section::Unknown, Section::Unknown, Section::Unknown]);
    }

    #[test]
    fn numeric_display_fields_read_as_text() {
        let catalog = parse(
            r#"{"projects":[{"id":"a","title":2024,"tags":["Rust",3],
                "meta":{"role":"Lead","timeline":2023,"teamSize":4},
                "sections":[{"type":"results","heading":"Impact","content":"",
                    "metrics":[{"value":95,"label":"Score"},{"value":"3x","label":null}]}]}]}"#,
        );
        let project = &catalog.projects[0];
        assert_eq!(project.title, "2024");
        assert_eq!(project.tags, vec!["Rust".to_string(), "3".to_string()]);
        assert_eq!(project.meta.timeline, "2023");
        assert_eq!(project.meta.team_size, "4");

        let Section::Results { metrics, .. } = &project.content_sections().unwrap()[0] else {
            panic!("results section did not decode");
        };
        assert_eq!(metrics[0], Metric { value: "95".into(), label: "Score".into() });
        assert_eq!(metrics[1], Metric { value: "3x".into(), label: String::new() });
    }

    #[test]
    fn missing_title_does_not_fail_the_catalog() {
        let catalog = parse(r#"{"projects":[{"id":"a"},{"id":"b","title":"B"}]}"#);
        assert_eq!(catalog.projects.len(), 2);
        assert_eq!(catalog.projects[0].title, "");
    }

    #[test]
    fn neighbours_follow_list_order() {
        let catalog = parse(
            r#"{"projects":[{"id":"a","title":"A"},{"id":"b","title":"B"},{"id":"c","title":"C"}]}"#,
        );
        let (prev, next) = catalog.neighbours("a");
        assert!(prev.is_none());
        assert_eq!(next.unwrap().id, "b");
        let (prev, next) = catalog.neighbours("c");
        assert_eq!(prev.unwrap().id, "b");
        assert!(next.is_none());
        assert!(matches!(catalog.neighbours("zzz"), (None, None)));
    }
}
