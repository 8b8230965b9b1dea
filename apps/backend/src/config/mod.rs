pub mod db;
pub mod match_service;
