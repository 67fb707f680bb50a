//! Content builder interface and the prompt-builder families.
//!
//! This module defines the [`ContentBuilder`] trait that every prompt
//! builder implements, plus the supporting input types
//! ([`GenerationInput`], [`BlueprintValue`], [`FieldValue`]) and one
//! submodule per content family.
//!
//! A builder owns nothing but a handle to the shared LLM client. Its job
//! is to turn structured input values into a system/user prompt pair and
//! relay streamed chunks to the caller's progress callback. One builder
//! can serve several registry titles: the descriptor's fixed params are
//! handed through [`GenerationInput::params`] (e.g. the advertising
//! builder receives the target platform that way).

pub mod advertising;
pub mod article;
pub mod book;
pub mod branding;
pub mod email;
pub mod funnel;
pub mod input;
pub mod landing_page;
pub mod linkedin;
pub mod press;
mod prompt;
pub mod trait_def;
pub mod vsl;
pub mod webinar;

pub use advertising::AdCopyBuilder;
pub use article::ArticleBuilder;
pub use book::BookBuilder;
pub use branding::BrandingBuilder;
pub use email::EmailBuilder;
pub use funnel::FunnelStepBuilder;
pub use input::{BlueprintEntry, BlueprintValue, FieldValue, GenerationInput};
pub use landing_page::LandingPageBuilder;
pub use linkedin::LinkedInBuilder;
pub use press::PressReleaseBuilder;
pub use trait_def::{ContentBuilder, ProgressFn};
pub use vsl::VslBuilder;
pub use webinar::WebinarBuilder;
