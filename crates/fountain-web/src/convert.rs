use std::fmt::Display;

use anyhow::anyhow;
use fountain_core::{FlowPath, PathKind, PickupMode, Status};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;

#[inline]
pub fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn set(obj: &Object, key: &str, value: impl Into<JsValue>) -> anyhow::Result<()> {
    Reflect::set(obj, &JsValue::from_str(key), &value.into())
        .map_err(|e| anyhow!("setting `{key}`: {:?}", e))?;
    Ok(())
}

pub fn status_to_js(status: &Status) -> anyhow::Result<Object> {
    let obj = Object::new();
    set(&obj, "levelTop", status.level_top)?;
    set(&obj, "levelBasin", status.level_basin)?;
    set(&obj, "levelReservoir", status.level_reservoir)?;
    set(&obj, "pressure", status.pressure)?;
    set(&obj, "active", status.active)?;
    // UI labels, resolved through the fixed mapping table
    let display = Object::new();
    for (label, level) in status.display() {
        set(&display, label.as_str(), level)?;
    }
    set(&obj, "display", display)?;
    Ok(obj)
}

fn kind_name(kind: PathKind) -> &'static str {
    match kind {
        PathKind::Drain => "drain",
        PathKind::AirLine => "airLine",
        PathKind::Riser => "riser",
        PathKind::User => "user",
    }
}

pub fn path_to_js(path: &FlowPath) -> anyhow::Result<Object> {
    let obj = Object::new();
    set(&obj, "handle", path.handle.raw())?;
    set(&obj, "kind", kind_name(path.kind))?;
    set(&obj, "from", path.from.name())?;
    set(&obj, "to", path.to.name())?;
    set(
        &obj,
        "pickup",
        match path.pickup {
            PickupMode::Normal => "normal",
            PickupMode::BottomPickup => "bottom",
        },
    )?;
    Ok(obj)
}
