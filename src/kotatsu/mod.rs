mod reader;
mod records;
mod writer;

pub use reader::read_kotatsu;
pub use writer::write_kotatsu;
