//! Plugin-provided API resources.
//!
//! Plugins that expose REST resources implement [`OpenApiProvider`] and are
//! collected in a [`PluginRegistry`]. When a registry yields at least one
//! resource, the generator documents those instead of scanning DTO files.

use crate::model::ApiModel;
use log::debug;
use std::fmt;

/// An API resource contributed by a plugin
pub struct ApiResource {
    /// Singular name, e.g. `article`
    pub name: String,
    /// Collection name, e.g. `articles`
    pub plural_name: String,
    /// Collection path, e.g. `/api/articles`
    pub base_path: String,
    /// Overrides the default collection description
    pub description: Option<String>,
    /// Operation tags, defaults to the schema name when empty
    pub tags: Vec<String>,
    pub create_model: Option<Box<dyn ApiModel>>,
    pub response_model: Option<Box<dyn ApiModel>>,
    pub update_model: Option<Box<dyn ApiModel>>,
}

impl ApiResource {
    pub fn new(name: &str, plural_name: &str, base_path: &str) -> Self {
        Self {
            name: name.to_string(),
            plural_name: plural_name.to_string(),
            base_path: base_path.to_string(),
            description: None,
            tags: Vec::new(),
            create_model: None,
            response_model: None,
            update_model: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    pub fn with_create_model(mut self, model: impl ApiModel + 'static) -> Self {
        self.create_model = Some(Box::new(model));
        self
    }

    pub fn with_response_model(mut self, model: impl ApiModel + 'static) -> Self {
        self.response_model = Some(Box::new(model));
        self
    }

    pub fn with_update_model(mut self, model: impl ApiModel + 'static) -> Self {
        self.update_model = Some(Box::new(model));
        self
    }
}

impl fmt::Debug for ApiResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResource")
            .field("name", &self.name)
            .field("plural_name", &self.plural_name)
            .field("base_path", &self.base_path)
            .field("description", &self.description)
            .field("tags", &self.tags)
            .field("create_model", &self.create_model.is_some())
            .field("response_model", &self.response_model.is_some())
            .field("update_model", &self.update_model.is_some())
            .finish()
    }
}

/// Supplies resources to document
pub trait OpenApiProvider {
    fn openapi_resources(&self) -> Vec<ApiResource>;
}

/// A registered plugin
pub trait Plugin {
    fn name(&self) -> &str;

    /// The plugin's resource provider, if it exposes any REST resources
    fn openapi_provider(&self) -> Option<&dyn OpenApiProvider> {
        None
    }
}

/// Plugins in registration order
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: impl Plugin + 'static) {
        debug!("Registered plugin {}", plugin.name());
        self.plugins.push(Box::new(plugin));
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter().map(|plugin| plugin.as_ref())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|plugin| plugin.name()))
            .finish()
    }
}

/// Collects resources from every plugin that provides them, in registration
/// order. No registry means no resources.
pub fn load_resources_from_plugins(registry: Option<&PluginRegistry>) -> Vec<ApiResource> {
    let Some(registry) = registry else {
        return Vec::new();
    };

    let mut resources = Vec::new();
    for plugin in registry.iter() {
        if let Some(provider) = plugin.openapi_provider() {
            let provided = provider.openapi_resources();
            debug!("Plugin {} provides {} resources", plugin.name(), provided.len());
            resources.extend(provided);
        }
    }
    resources
}
