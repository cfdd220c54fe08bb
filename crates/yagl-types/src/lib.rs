pub mod expression_kind;
pub mod feature;
pub mod grf_label;
pub mod grm_operator;
pub mod operation;
pub mod sprite_colour;
pub mod zoom_level;

pub use expression_kind::ExpressionKind;
pub use feature::Feature;
pub use grf_label::GrfLabel;
pub use grm_operator::GrmOperator;
pub use operation::Operation;
pub use sprite_colour::SpriteColour;
pub use zoom_level::ZoomLevel;

/// Identifier linking a sprite index in the data section to the images and
/// sounds stored in the graphics section.
pub type SpriteId = u32;
