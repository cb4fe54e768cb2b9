//! Built-in prompt templates, one per document kind.
//!
//! These are the fallback texts the store resolves to when no persisted
//! override exists for a name. Placeholders use minijinja syntax and must
//! stay within the fields of the matching context struct in
//! [`crate::prompts`].

/// Functional requirements specification prompt.
pub const REQUIREMENTS_TEMPLATE: &str = "\
You are an expert Business Analyst specializing in system documentation.

Generate a **Functional Requirements Specification** document from the given Python module.

Module: {{ filename }}
Description: {{ module_doc }}
Functions Summary: {{ functions_summary }}
Constants: {{ constants }}

Format as:
1. Overview
2. Functional Requirements
3. Non-Functional Requirements
4. Traceability
5. Future Enhancements
";

/// Gherkin feature file plus step definitions prompt.
pub const FEATURE_TEMPLATE: &str = "\
You are a BDD Automation Expert skilled in Gherkin syntax.

Using the given Python module info, generate:
1. A Gherkin `.feature` file
2. Python Behave step definitions

Module: {{ filename }}
Description: {{ module_doc }}
Functions Summary: {{ functions_summary }}
";

/// JIRA-style user story prompt.
pub const STORY_TEMPLATE: &str = "\
You are a Product Owner generating JIRA-style stories for `{{ filename }}`.

Create:
- Title
- Description
- Acceptance Criteria
- Business Value
- Story Points
";

/// Code update prompt: rewrite a file so it satisfies a requirements
/// document while preserving current behavior.
pub const CODE_UPDATE_TEMPLATE: &str = "\
You are a Senior Python Engineer.

Update `{{ filename }}` based on these requirements:
{{ requirements }}

Current contents of `{{ filename }}`:
{{ source }}

Maintain existing functionality and follow PEP8 standards.
";

/// Pytest test generation prompt.
pub const TEST_TEMPLATE: &str = "\
You are a QA Automation Engineer.

Generate pytest unit tests for:
{{ functions_summary }}

Include edge cases and proper naming conventions.
";
