/// Capability attached to a component when it is registered with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Built by the island framework's component factory; this renderer owns it.
    Island,
    /// Anything else; left for other renderers.
    Foreign,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentTag {
    pub name: String,
    pub kind: ComponentKind,
}

impl ComponentTag {
    pub fn island(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ComponentKind::Island,
        }
    }

    pub fn foreign(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ComponentKind::Foreign,
        }
    }
}

/// Whether this renderer should handle the component.
pub fn is_renderable(tag: &ComponentTag) -> bool {
    tag.kind == ComponentKind::Island
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_island_components_are_renderable() {
        assert!(is_renderable(&ComponentTag::island("Counter")));
        // Name alone never decides.
        assert!(!is_renderable(&ComponentTag::foreign("QwikComponent")));
    }
}
