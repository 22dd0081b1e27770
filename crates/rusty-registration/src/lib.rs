// Rusty Registration - field validation for front-end user registration
// Resolves the rule-set a request selects and checks submitted records against it

pub mod config;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod ports;
pub mod request_context;
pub mod resolver;
pub mod rules;
pub mod validator;
pub mod value;
pub mod verdict;

// Configuration and errors
pub use config::{Config, PluginConfig, ValidationSettings};
pub use error::{ResolveError, UnknownRule};

// Collaborators supplied by the host application
pub use events::{EventDispatcher, UniqueUserEvent, UniqueUserListener};
pub use ports::{ConfigurationSource, PluginRegistry, UserStore};

// Request handling
pub use request_context::{ApplicationType, RequestContext, RequestParams};
pub use resolver::{ContextResolver, ControllerName, ResolvedContext, ValidationName};

// Rules and their evaluation
pub use evaluator::{FieldContext, RuleEvaluator};
pub use rules::{parse_inline, FieldRules, Rule, RuleKind, RuleSet};
pub use validator::{ClientsideValidator, ServersideValidator};
pub use value::{FieldValue, UserRecord};
pub use verdict::{FailedRule, FieldVerdict, RecordVerdict};

// Re-export the predicates the evaluator is built on
pub use rusty_forms_validation as predicates;
