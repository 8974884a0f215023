//! Document persistence boundary.
//!
//! A document is a JSON object tagged with [`DOCUMENT_TYPE`] and
//! [`DOCUMENT_VERSION`], carrying the element list and a partial view
//! state. [`load_document`] rejects the whole file if any element is
//! invalid or container links disagree; [`sanitize_elements`] is the
//! lenient path for pasted batches.

use crate::elements::{Element, ElementId};
use crate::scene::Scene;
use crate::viewport::{Viewport, clamp_zoom};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub const DOCUMENT_TYPE: &str = "inkgraph";
pub const DOCUMENT_VERSION: u32 = 1;

/// Errors raised while reading or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("Unexpected document type {0:?}")]
    WrongFileType(Option<String>),

    #[error("Document has no version")]
    MissingVersion,

    #[error("Unsupported document version {0}")]
    UnsupportedVersion(u64),

    #[error("Document has no element list")]
    MissingElements,

    #[error("Invalid element at index {index}: {reason}")]
    InvalidElement { index: usize, reason: String },

    #[error("Invalid view state: {0}")]
    InvalidViewState(String),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// The persisted slice of view state. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_background_color: Option<String>,
}

impl ViewState {
    /// Viewport described by this state, with defaults for missing fields.
    pub fn viewport(&self) -> Viewport {
        let default = Viewport::default();
        Viewport::new(
            self.scroll_x.unwrap_or(default.scroll_x),
            self.scroll_y.unwrap_or(default.scroll_y),
            self.zoom.unwrap_or(default.zoom),
        )
    }

    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            scroll_x: Some(viewport.scroll_x),
            scroll_y: Some(viewport.scroll_y),
            zoom: Some(viewport.zoom),
            ..Self::default()
        }
    }
}

/// A complete saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub app_state: ViewState,
}

impl DocumentFile {
    pub fn new(elements: Vec<Element>, app_state: ViewState) -> Self {
        Self {
            kind: DOCUMENT_TYPE.to_string(),
            version: DOCUMENT_VERSION,
            elements,
            app_state,
        }
    }

    /// Rebuild a scene from the element list, repairing draw order.
    pub fn into_scene(self) -> Scene {
        Scene::from_elements(self.elements)
    }
}

/// Structural checks on a decoded element.
pub fn validate_element(element: &Element) -> Result<(), String> {
    let base = element.base();
    if !base.is_finite() {
        return Err("non-finite geometry or style".into());
    }
    if !(0.0..=100.0).contains(&base.opacity) {
        return Err(format!("opacity {} outside 0..=100", base.opacity));
    }
    match element {
        Element::Arrow(arrow) => {
            if arrow.points.len() < 2 {
                return Err(format!("arrow has {} points", arrow.points.len()));
            }
            if !arrow.points.iter().all(|p| p.is_finite()) {
                return Err("non-finite arrow point".into());
            }
            let offsets_finite = arrow
                .bindings()
                .all(|b| b.focus.is_finite() && b.gap.is_finite() && b.offset.is_none_or(|o| o.is_finite()));
            if !offsets_finite {
                return Err("non-finite arrow binding".into());
            }
        }
        Element::Text(text) => {
            if !(text.font_size.is_finite() && text.font_size > 0.0) {
                return Err(format!("font size {} is not positive", text.font_size));
            }
        }
        Element::Rectangle(shape) | Element::Ellipse(shape) | Element::Line(shape) => {
            if shape.children_ids.contains(&base.id) {
                return Err("container lists itself as a child".into());
            }
        }
    }
    Ok(())
}

/// Checks that container links agree in both directions.
///
/// Every `parentId` names a shape that lists the element, every listed
/// child exists and names the container back, only shapes take part, and
/// no element is its own ancestor. Errors carry the offending index.
pub fn validate_hierarchy(elements: &[Element]) -> Result<(), (usize, String)> {
    let by_id: HashMap<ElementId, usize> = elements.iter().enumerate().map(|(i, el)| (el.id(), i)).collect();

    for (index, element) in elements.iter().enumerate() {
        let id = element.id();
        if let Some(parent_id) = element.parent_id() {
            let Some(parent) = by_id.get(&parent_id).map(|&i| &elements[i]) else {
                return Err((index, format!("parent {parent_id} does not exist")));
            };
            if !element.is_shape() || !parent.is_shape() {
                return Err((index, "only shapes can be nested".into()));
            }
            if !parent.children_ids().contains(&id) {
                return Err((index, format!("parent {parent_id} does not list it")));
            }
        }
        for child_id in element.children_ids() {
            let Some(child) = by_id.get(child_id).map(|&i| &elements[i]) else {
                return Err((index, format!("child {child_id} does not exist")));
            };
            if child.parent_id() != Some(id) {
                return Err((index, format!("child {child_id} names another parent")));
            }
        }

        let mut cursor = element.parent_id();
        for _ in 0..elements.len() {
            match cursor {
                Some(ancestor) if ancestor == id => return Err((index, "containment cycle".into())),
                Some(ancestor) => cursor = by_id.get(&ancestor).and_then(|&i| elements[i].parent_id()),
                None => break,
            }
        }
    }
    Ok(())
}

fn decode_element(value: Value) -> Result<Element, String> {
    let element: Element = serde_json::from_value(value).map_err(|e| e.to_string())?;
    validate_element(&element)?;
    Ok(element)
}

/// Parse and fully validate a document.
pub fn load_document(json: &str) -> DocumentResult<DocumentFile> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Object(mut root) = root else {
        return Err(DocumentError::NotAnObject);
    };

    match root.get("type").and_then(Value::as_str) {
        Some(DOCUMENT_TYPE) => {}
        other => return Err(DocumentError::WrongFileType(other.map(str::to_string))),
    }
    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(DocumentError::MissingVersion)?;
    if version != u64::from(DOCUMENT_VERSION) {
        log::warn!("Rejecting document with version {version}");
        return Err(DocumentError::UnsupportedVersion(version));
    }

    let Some(Value::Array(values)) = root.remove("elements") else {
        return Err(DocumentError::MissingElements);
    };
    let mut seen: HashSet<ElementId> = HashSet::new();
    let mut elements = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let element = decode_element(value).map_err(|reason| {
            log::warn!("Rejecting document: element {index} is invalid: {reason}");
            DocumentError::InvalidElement { index, reason }
        })?;
        if !seen.insert(element.id()) {
            return Err(DocumentError::InvalidElement {
                index,
                reason: format!("duplicate id {}", element.id()),
            });
        }
        elements.push(element);
    }
    validate_hierarchy(&elements).map_err(|(index, reason)| {
        log::warn!("Rejecting document: element {index} has broken containment: {reason}");
        DocumentError::InvalidElement { index, reason }
    })?;

    let app_state = match root.remove("appState") {
        None | Some(Value::Null) => ViewState::default(),
        Some(value) => serde_json::from_value(value).map_err(|e| DocumentError::InvalidViewState(e.to_string()))?,
    };

    log::debug!("Loaded document with {} elements", elements.len());
    Ok(DocumentFile::new(elements, sanitize_view_state(app_state)))
}

/// Serialize `scene` and `view` as a document.
pub fn save_document(scene: &Scene, view: &ViewState) -> DocumentResult<String> {
    let file = DocumentFile::new(scene.to_elements(), view.clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Decode what can be decoded, dropping invalid entries.
pub fn sanitize_elements(values: Vec<Value>) -> Vec<Element> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match decode_element(value) {
            Ok(element) => Some(element),
            Err(reason) => {
                log::warn!("Dropping element {index}: {reason}");
                None
            }
        })
        .collect()
}

/// Drop non-finite numbers and clamp zoom into the supported range.
pub fn sanitize_view_state(state: ViewState) -> ViewState {
    let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
    ViewState {
        scroll_x: finite(state.scroll_x),
        scroll_y: finite(state.scroll_y),
        zoom: finite(state.zoom).map(clamp_zoom),
        grid_size: finite(state.grid_size).filter(|g| *g > 0.0),
        view_background_color: state.view_background_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementOptions, ElementType, create_element};
    use serde_json::json;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let opts = ElementOptions::default();
        scene.add(create_element(ElementType::Rectangle, 0.0, 0.0, 100.0, 50.0, &opts));
        scene.add(create_element(ElementType::Arrow, 10.0, 10.0, 80.0, 0.0, &opts));
        scene.add(create_element(ElementType::Text, 5.0, 5.0, 40.0, 24.0, &opts));
        scene
    }

    fn document_value(scene: &Scene) -> Value {
        serde_json::from_str(&save_document(scene, &ViewState::default()).unwrap()).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let scene = sample_scene();
        let view = ViewState { zoom: Some(2.0), grid_size: Some(20.0), ..ViewState::default() };
        let json = save_document(&scene, &view).unwrap();
        let file = load_document(&json).unwrap();
        assert_eq!(file.kind, DOCUMENT_TYPE);
        assert_eq!(file.app_state, view);
        assert_eq!(file.into_scene(), scene);
    }

    #[test]
    fn test_rejects_wrong_type_and_version() {
        let mut value = document_value(&sample_scene());
        value["type"] = json!("whiteboard");
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::WrongFileType(Some(_)))));

        let mut value = document_value(&sample_scene());
        value["version"] = json!(2);
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::UnsupportedVersion(2))));

        let mut value = document_value(&sample_scene());
        value.as_object_mut().unwrap().remove("version");
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::MissingVersion)));

        assert!(matches!(load_document("[]"), Err(DocumentError::NotAnObject)));
        assert!(matches!(load_document("{"), Err(DocumentError::Json(_))));
    }

    #[test]
    fn test_rejects_whole_file_on_one_bad_element() {
        let mut value = document_value(&sample_scene());
        value["elements"][1]["points"] = json!([{ "x": 0.0, "y": 0.0 }]);
        match load_document(&value.to_string()) {
            Err(DocumentError::InvalidElement { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected invalid element, got {other:?}"),
        }

        let mut value = document_value(&sample_scene());
        value["elements"][0]["opacity"] = json!(150);
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::InvalidElement { index: 0, .. })));

        let mut value = document_value(&sample_scene());
        value["elements"][2]["fontSize"] = json!(0);
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::InvalidElement { index: 2, .. })));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut value = document_value(&sample_scene());
        let first = value["elements"][0].clone();
        value["elements"].as_array_mut().unwrap().push(first);
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::InvalidElement { index: 3, .. })));
    }

    fn nested_scene() -> Scene {
        let mut scene = sample_scene();
        let opts = ElementOptions::default();
        let parent = scene.ordered_ids()[0];
        let child = scene.add(create_element(ElementType::Ellipse, 10.0, 10.0, 20.0, 20.0, &opts));
        assert!(crate::container::attach(child, parent, &mut scene));
        scene
    }

    #[test]
    fn test_accepts_consistent_nesting() {
        let scene = nested_scene();
        let json = save_document(&scene, &ViewState::default()).unwrap();
        assert_eq!(load_document(&json).unwrap().into_scene(), scene);
    }

    #[test]
    fn test_rejects_one_sided_container_links() {
        // Listed as a child without naming the parent back.
        let mut value = document_value(&nested_scene());
        value["elements"][3]["parentId"] = Value::Null;
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::InvalidElement { index: 0, .. })));

        // Naming a parent that does not list it.
        let mut value = document_value(&nested_scene());
        value["elements"][0]["childrenIds"] = json!([]);
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::InvalidElement { index: 3, .. })));

        // Parent that is not in the file.
        let mut value = document_value(&nested_scene());
        value["elements"][0]["childrenIds"] = json!([]);
        value["elements"][3]["parentId"] = json!(uuid::Uuid::new_v4());
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::InvalidElement { index: 3, .. })));
    }

    #[test]
    fn test_rejects_nested_non_shapes_and_cycles() {
        let mut value = document_value(&nested_scene());
        let parent = value["elements"][0]["id"].clone();
        let text = value["elements"][2]["id"].clone();
        let child = value["elements"][3]["id"].clone();
        value["elements"][0]["childrenIds"] = json!([child, text]);
        value["elements"][2]["parentId"] = parent;
        assert!(matches!(load_document(&value.to_string()), Err(DocumentError::InvalidElement { index: 2, .. })));

        let mut value = document_value(&nested_scene());
        let parent = value["elements"][0]["id"].clone();
        let child = value["elements"][3]["id"].clone();
        value["elements"][3]["childrenIds"] = json!([parent]);
        value["elements"][0]["parentId"] = child;
        match load_document(&value.to_string()) {
            Err(DocumentError::InvalidElement { index, reason }) => {
                assert_eq!(index, 0);
                assert!(reason.contains("cycle"), "{reason}");
            }
            other => panic!("expected a containment cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_sanitize_elements_drops_invalid() {
        let value = document_value(&sample_scene());
        let mut values = value["elements"].as_array().unwrap().clone();
        values.push(json!({ "type": "hexagon" }));
        values.push(json!("garbage"));
        let elements = sanitize_elements(values);
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_sanitize_view_state() {
        let state = ViewState {
            scroll_x: Some(f64::NAN),
            scroll_y: Some(4.0),
            zoom: Some(12.0),
            grid_size: Some(-1.0),
            view_background_color: Some("#fff".into()),
        };
        let clean = sanitize_view_state(state);
        assert!(clean.scroll_x.is_none());
        assert_eq!(clean.scroll_y, Some(4.0));
        assert_eq!(clean.zoom, Some(3.0));
        assert!(clean.grid_size.is_none());
    }

    #[test]
    fn test_load_clamps_zoom() {
        let mut value = document_value(&sample_scene());
        value["appState"] = json!({ "zoom": 0.01, "scrollX": 5.0 });
        let file = load_document(&value.to_string()).unwrap();
        assert_eq!(file.app_state.zoom, Some(0.1));
        assert!((file.app_state.viewport().scroll_x - 5.0).abs() < f64::EPSILON);
    }
}
