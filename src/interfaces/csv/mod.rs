pub mod cart_reader;
pub mod outcome_writer;
