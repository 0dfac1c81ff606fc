pub mod contact_mapper;

pub use contact_mapper::ContactMapper;
