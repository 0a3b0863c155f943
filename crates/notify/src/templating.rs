//! Minijinja template rendering for notification messages.
//!
//! Renders the stock alert subject and body with access to the country,
//! the products in stock, the store link and the run timestamp.
//!
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use crate::traits::{Notification, NotifyError};

/// Context data available to notification templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TemplateContext {
    /// Country code the check ran for.
    pub country: String,
    /// Display names of the products in stock, in catalog order.
    pub products: Vec<String>,
    /// Store page to buy from.
    pub store_url: String,
    /// Run timestamp, already formatted.
    pub now: String,
}

/// Renders notification templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Templates get minijinja's built-in filters (`upper`, `join`, ...) and
    /// nothing else.
    fn build_env() -> minijinja::Environment<'static> {
        minijinja::Environment::new()
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, ctx: &TemplateContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Validate that a template string parses without errors.
    ///
    /// This does not evaluate the template; it only checks syntax.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }

    /// Render subject and body into a [`Notification`].
    pub fn render_notification(
        &self,
        subject_template: &str,
        body_template: &str,
        ctx: &TemplateContext,
    ) -> Result<Notification, NotifyError> {
        Ok(Notification {
            subject: self.render(subject_template, ctx)?,
            body: self.render(body_template, ctx)?,
        })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
