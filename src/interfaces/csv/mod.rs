pub mod student_reader;
