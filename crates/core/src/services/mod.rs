pub mod align_service;
pub mod color_service;
pub mod domain_service;
pub mod endpoint_service;
pub mod label_service;
pub mod normalize_service;
pub mod ranking_service;
