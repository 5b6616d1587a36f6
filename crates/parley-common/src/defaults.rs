//! Backend defaults shared by the config schema and the session client.

/// API origin of the web backend.
pub const DEFAULT_API_URL: &str = "https://chat.openai.com/";

/// Model identifier sent with every turn.
pub const DEFAULT_MODEL: &str = "text-davinci-002-render";
