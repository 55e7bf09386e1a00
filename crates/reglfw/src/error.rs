use core::ffi::c_int;
use std::ffi::NulError;

use reglfw_sys as sys;
use thiserror::Error;

use crate::{InitHint, MAX_WINDOWS};

/// A GLFW error as reported by `glfwGetError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{desc} ({code:#x})")]
pub struct Error {
    pub code: i32,
    pub desc: String,
}

impl Error {
    pub fn kind(&self) -> ErrorCode {
        ErrorCode::from(self.code)
    }
}

pub(crate) fn unknown_error() -> Error {
    Error {
        code: -1,
        desc: String::from("Unknown error"),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    NoCurrentContext,
    InvalidEnum,
    InvalidValue,
    OutOfMemory,
    ApiUnavailable,
    VersionUnavailable,
    PlatformError,
    FormatUnavailable,
    NoWindowContext,
    CursorUnavailable,
    FeatureUnavailable,
    FeatureUnimplemented,
    PlatformUnavailable,
    Unknown(i32),
}

impl From<c_int> for ErrorCode {
    fn from(code: c_int) -> Self {
        match code {
            sys::GLFW_NOT_INITIALIZED => ErrorCode::NotInitialized,
            sys::GLFW_NO_CURRENT_CONTEXT => ErrorCode::NoCurrentContext,
            sys::GLFW_INVALID_ENUM => ErrorCode::InvalidEnum,
            sys::GLFW_INVALID_VALUE => ErrorCode::InvalidValue,
            sys::GLFW_OUT_OF_MEMORY => ErrorCode::OutOfMemory,
            sys::GLFW_API_UNAVAILABLE => ErrorCode::ApiUnavailable,
            sys::GLFW_VERSION_UNAVAILABLE => ErrorCode::VersionUnavailable,
            sys::GLFW_PLATFORM_ERROR => ErrorCode::PlatformError,
            sys::GLFW_FORMAT_UNAVAILABLE => ErrorCode::FormatUnavailable,
            sys::GLFW_NO_WINDOW_CONTEXT => ErrorCode::NoWindowContext,
            sys::GLFW_CURSOR_UNAVAILABLE => ErrorCode::CursorUnavailable,
            sys::GLFW_FEATURE_UNAVAILABLE => ErrorCode::FeatureUnavailable,
            sys::GLFW_FEATURE_UNIMPLEMENTED => ErrorCode::FeatureUnimplemented,
            sys::GLFW_PLATFORM_UNAVAILABLE => ErrorCode::PlatformUnavailable,
            other => ErrorCode::Unknown(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("init hint {0:?} was rejected: {1}")]
    Hint(InitHint, Error),
    #[error("glfwInit failed: {0}")]
    Init(Error),
    #[error("the GLFW init lock is poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum TryInitError {
    #[error(transparent)]
    InitError(#[from] InitError),
    #[error("GLFW is already initialized")]
    WouldBlock,
}

#[derive(Debug, Error)]
pub enum CreateWindowError {
    #[error("window title contains a nul byte")]
    Title(#[from] NulError),
    #[error("glfwCreateWindow failed: {0}")]
    CreateWindow(Error),
    #[error("window registry is full ({} windows)", MAX_WINDOWS)]
    RegistryFull,
}

#[derive(Debug, Error)]
pub enum HintError {
    #[error("unexpected window hint {0}")]
    UnknownFlag(i32),
    #[error("glfwWindowHint failed: {0}")]
    Native(#[from] Error),
}
