pub mod ranked_candidate;
pub mod retrieval_config;
pub mod stored_recipe;
