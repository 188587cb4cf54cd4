pub mod bookmark_routes;
pub mod tag_routes;
