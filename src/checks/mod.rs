mod content_to_slot_usages;
mod paper_button_style;

pub use {content_to_slot_usages::ContentToSlotUsages, paper_button_style::PaperButtonStyle};
