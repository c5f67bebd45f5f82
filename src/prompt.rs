//! Prompt construction for README generation.

use crate::context::ProjectContext;

/// Instruction preamble sent with every generation request. The assembled
/// repository payload is substituted for `{repository_content}`.
const GENERATION_PROMPT_TEMPLATE: &str = r"
You are an expert AI programmer tasked with generating a comprehensive and suitable README.md file for a given code repository.

The input will be a single string variable containing the contents of all relevant files in the repository. Each file's content is preceded by its filename and a newline character, and files are separated by a newline character.

Your task is to:

1.  **Analyze the provided file contents** to understand the **purpose and functionality** of the repository. Determine the primary programming language(s) used and any significant frameworks or libraries.
2.  **Identify the type of project** (e.g., web application, mobile app, data science project, library, command-line tool, terraform module, terraform provider, terraform code etc.).
3.  **Generate a complete README.md file in Markdown format.** The primary goal is to create a README that is genuinely useful and informative for this specific repository.

    Consider the common README sections (title, description, features, tech stack, installation, usage, configuration, running tests, contributing, license) as suggestions, not requirements. Include, exclude, or adapt sections based on what is most relevant for understanding and using this particular repository.

**Important Considerations:**

* The README should be well-structured, clear, and easy to understand.
* Use appropriate Markdown formatting (headings, lists, code blocks, etc.).
* Infer as much as possible from the provided code. If certain information isn't present in the code, make reasonable suggestions or indicate where the user should fill in details.
* Be concise but thorough. The length and detail should be appropriate for the project's complexity.
* The README should be in markdown format.

Here is the content of the repository:

{repository_content}
";

/// Build the full prompt for a project context. The context payload
/// already carries the user's additional note in its final position.
pub fn build_prompt(context: &ProjectContext) -> String {
    GENERATION_PROMPT_TEMPLATE.replace("{repository_content}", &context.render())
}
