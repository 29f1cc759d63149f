//! # 回调地址校验模块
//!
//! 判断候选 URL 能否注册为 OAuth 重定向目标，防止开放重定向和凭证泄露

mod policy;
mod validator;

pub use policy::CallbackPolicy;
pub use validator::{CallbackRejection, CallbackValidator};
