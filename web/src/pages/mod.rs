pub mod crop;
pub mod dashboard;
pub mod disease;
pub mod landing;
pub mod login;
pub mod settings;
pub mod signup;
