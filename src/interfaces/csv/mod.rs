pub mod sale_reader;
