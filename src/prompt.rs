//! Prompt templates for the documentation writer. Only the text is built
//! here; sending it to a model is the caller's business.

use std::fmt::Write;

pub const EMPTY_README: &str = "README content was empty or not provided.";

#[derive(Debug, Clone)]
pub struct DocInputs<'a> {
    pub repo_name: &'a str,
    pub readme_summary: &'a str,
    pub file_tree: &'a str,
    pub diagram: &'a str,
    /// API index text; the API section is left out when absent.
    pub api_index: Option<&'a str>,
}

/// Prompt asking for a one or two paragraph README summary, or `None` when
/// there is nothing to summarize.
pub fn readme_summary_prompt(readme: &str) -> Option<String> {
    if readme.trim().is_empty() {
        return None;
    }
    Some(format!(
        "You are a technical writer. Summarize the following README.md file.\n\
         Focus on the project's main purpose, how to install it, and how to run it.\n\
         Keep the summary to one or two paragraphs.\n\
         \n\
         README Content:\n\
         ---\n\
         {readme}\n\
         ---\n"
    ))
}

pub fn final_docs_prompt(inputs: &DocInputs<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_final_docs_prompt(&mut out, inputs);
    out
}

fn write_final_docs_prompt(out: &mut String, inputs: &DocInputs<'_>) -> std::fmt::Result {
    let repo = inputs.repo_name;
    writeln!(out, "You are a documentation writer for software repositories.")?;
    writeln!(
        out,
        "Produce one complete, well organized markdown document for the repository below."
    )?;
    writeln!(out)?;
    writeln!(out, "You are given:")?;
    writeln!(out, "1. **Repo Name:** {repo}")?;
    writeln!(out, "2. **README Summary:** an overview of the project.")?;
    writeln!(out, "3. **File Tree:** every file in the repository.")?;
    writeln!(
        out,
        "4. **Code Context Graph:** a Mermaid diagram of files, functions and classes."
    )?;
    if inputs.api_index.is_some() {
        writeln!(
            out,
            "5. **API Reference Data:** the functions and classes declared in each file."
        )?;
    }
    writeln!(out)?;
    writeln!(out, "The document must contain these sections:")?;
    writeln!(out, "1. **Overview:** start from the README summary.")?;
    writeln!(out, "2. **Repository Map:** show the complete file tree.")?;
    writeln!(out, "3. **Code Context Graph:** show the Mermaid diagram.")?;
    if inputs.api_index.is_some() {
        writeln!(
            out,
            "4. **API Reference:** describe the functions and classes per file in prose \
             instead of pasting the data, e.g. \"`utils.py` provides the helper `do_thing()`\"."
        )?;
    }
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "**README Summary:**")?;
    writeln!(out, "{}", inputs.readme_summary)?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "**File Tree:**")?;
    writeln!(out, "```")?;
    write!(out, "{}", inputs.file_tree)?;
    writeln!(out, "```")?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "**Code Context Graph (CCG):**")?;
    writeln!(out, "```mermaid")?;
    write!(out, "{}", inputs.diagram)?;
    writeln!(out, "```")?;
    if let Some(api) = inputs.api_index {
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out, "**API Reference Data:**")?;
        writeln!(out, "{api}")?;
    }
    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(
        out,
        "Now write the complete markdown document. Start with the title `# Documentation for {repo}`."
    )
}
