/// Which flavour of the scene to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(clap::ValueEnum))]
pub enum Variant {
    /// Build the scene and draw it once; nothing moves.
    Static,
    /// Spin the cube, bounce the sphere, and show the stats overlay and control panel.
    #[default]
    Animated,
}

impl Variant {
    pub fn is_animated(self) -> bool {
        matches!(self, Variant::Animated)
    }

    pub fn title(self) -> &'static str {
        match self {
            Variant::Static => "Spotlit Scene (static)",
            Variant::Animated => "Spotlit Scene",
        }
    }
}
