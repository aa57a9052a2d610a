use std::path::{Component, Path};

/// True when `key` is a non-empty relative path made only of normal
/// components, so joining it onto a root cannot leave that root.
pub fn is_contained_path(key: &str) -> bool {
    !key.is_empty()
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// True when `name` is exactly one normal path component.
pub fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(only)), None) => only == name,
        _ => false,
    }
}
