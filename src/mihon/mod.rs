mod proto;
mod reader;
mod writer;

pub use reader::read_mihon;
pub use writer::write_mihon;
