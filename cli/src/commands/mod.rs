pub mod make_xml;
pub mod rename_all;

pub use make_xml::run as make_xml;
pub use rename_all::run as rename_all;
