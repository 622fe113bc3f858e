pub mod invoice;
pub mod payment;
pub mod ports;
pub mod receipt;
pub mod student;
