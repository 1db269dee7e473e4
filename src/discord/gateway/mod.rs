mod serenity_gateway;

pub use serenity_gateway::SerenityGateway;
