pub mod usuarios;
