pub mod animal_mapper;

pub use animal_mapper::AnimalMapper;
