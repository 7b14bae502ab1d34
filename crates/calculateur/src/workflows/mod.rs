pub mod calculateur;
