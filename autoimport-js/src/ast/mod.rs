pub mod code;
pub mod import_export;
pub mod jsx;
pub mod node;
pub mod stx;
