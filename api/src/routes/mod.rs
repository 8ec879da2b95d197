pub mod health_route;
pub mod ingredients_query;
pub mod search_route;
pub mod surprise_route;
