pub mod amplicon;
pub mod template;

// re-export for cleaner imports
pub use self::amplicon::Amplicon;
pub use self::template::{Template, TemplateStore};
