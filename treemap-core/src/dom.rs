// SVG surface for the browser build.
//
// Mirrors the retained Scene into the DOM:
//   <svg width height style="padding; background-color">
//     <g transform="translate(x,y)">          one per scene element
//       <rect id=name class="leaf" .../>
//       <text class="label" dy="0.35em" ...>name</text>
//     </g>
// Groups are created when an element first appears (appended, so later
// elements paint on top) and removed when it leaves the scene. Each group
// owns its click listener.

use std::collections::{HashMap, HashSet};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent};

use crate::config::AppConfig;
use crate::render::{ElementId, Scene, VisualElement};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub type ClickListener = Closure<dyn FnMut(MouseEvent)>;

struct CellNodes {
    group: Element,
    rect: Element,
    text: Element,
    _on_click: ClickListener,
}

pub struct SvgSurface {
    document: Document,
    svg: Element,
    cells: HashMap<ElementId, CellNodes>,
}

impl SvgSurface {
    /// Append a sized svg to the configured container.
    pub fn mount(document: Document, cfg: &AppConfig, width: f64, height: f64) -> Result<Self, JsValue> {
        let container = document
            .get_element_by_id(&cfg.container_id)
            .ok_or_else(|| JsValue::from_str(&format!("container #{} not found", cfg.container_id)))?;
        let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_attribute("width", &width.to_string())?;
        svg.set_attribute("height", &height.to_string())?;
        svg.set_attribute(
            "style",
            &format!("padding: {}px; background-color: {}", cfg.svg_padding_px, cfg.background),
        )?;
        container.append_child(&svg)?;
        Ok(Self { document, svg, cells: HashMap::new() })
    }

    /// Bring the DOM in line with `scene`. `listener` builds the click
    /// handler for newly created cells.
    pub fn sync(&mut self, scene: &Scene, listener: &dyn Fn(ElementId) -> ClickListener) -> Result<(), JsValue> {
        let live: HashSet<ElementId> = scene.elements().iter().map(|e| e.id).collect();
        self.cells.retain(|id, nodes| {
            let keep = live.contains(id);
            if !keep {
                nodes.group.remove();
            }
            keep
        });

        for el in scene.elements() {
            if !self.cells.contains_key(&el.id) {
                let nodes = self.create_cell(el, listener(el.id))?;
                self.cells.insert(el.id, nodes);
            }
            if let Some(nodes) = self.cells.get(&el.id) {
                update_cell(nodes, el)?;
            }
        }
        Ok(())
    }

    fn create_cell(&self, el: &VisualElement, on_click: ClickListener) -> Result<CellNodes, JsValue> {
        let group = self.document.create_element_ns(Some(SVG_NS), "g")?;

        let rect = self.document.create_element_ns(Some(SVG_NS), "rect")?;
        rect.set_attribute("id", &el.name)?;
        rect.set_attribute("class", "leaf")?;
        rect.set_attribute("fill", &el.fill.to_css())?;

        let text = self.document.create_element_ns(Some(SVG_NS), "text")?;
        text.set_attribute("class", "label")?;
        text.set_attribute("dy", "0.35em")?;
        text.set_attribute("font-family", "Arial")?;
        text.set_attribute("text-anchor", "middle")?;
        text.set_text_content(Some(&el.name));

        group.append_child(&rect)?;
        group.append_child(&text)?;
        group.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        self.svg.append_child(&group)?;

        Ok(CellNodes { group, rect, text, _on_click: on_click })
    }
}

fn update_cell(nodes: &CellNodes, el: &VisualElement) -> Result<(), JsValue> {
    nodes.group.set_attribute("transform", &el.transform())?;
    let s = &el.shape;
    for (name, value) in [
        ("x", s.x),
        ("y", s.y),
        ("width", s.width),
        ("height", s.height),
        ("rx", s.rx),
        ("ry", s.ry),
    ] {
        nodes.rect.set_attribute(name, &value.to_string())?;
    }
    nodes.text.set_attribute("x", &el.label.x.to_string())?;
    nodes.text.set_attribute("y", &el.label.y.to_string())?;
    Ok(())
}
