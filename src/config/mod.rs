mod settings;

pub use settings::{
    AcsConfig, AttachmentConfig, EmailConfig, LogConfig, LogFormat, ServerConfig, Settings,
};
