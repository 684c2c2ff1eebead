pub mod entity;
pub mod mapper;
pub mod memory_repo;
pub mod migrations;
pub mod sea_orm_repo;
pub mod seed;
