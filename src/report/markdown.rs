use super::CollaborationReport;

/// Render the report as a markdown document titled `title`.
pub fn render_markdown(r: &CollaborationReport, title: &str) -> String {
    let mut lines = vec![
        format!("# {title}"),
        String::new(),
        format!("## Repository: {}", r.repository),
        String::new(),
        format!("### InnerSource Ratio: {:.2}%", r.ratio * 100.0),
        String::new(),
    ];

    lines.push(match (r.team_explicit, &r.original_author, &r.original_manager) {
        (true, _, _) => "### Team ownership is explicitly specified".to_string(),
        (false, Some(author), Some(manager)) => {
            format!("### Original Commit Author: {author} (Manager: {manager})")
        }
        (false, Some(author), None) => format!("### Original Commit Author: {author}"),
        (false, None, _) => "### Original commit author information not available".to_string(),
    });
    lines.push(String::new());

    lines.push("## Team Members that Own the Repo:".to_string());
    list(&mut lines, &r.team_members, "No team members available.");

    lines.push(String::new());
    lines.push("## All Contributors:".to_string());
    list(&mut lines, &r.all_contributors, "No contributors found.");

    lines.push(String::new());
    lines.push("## Innersource Contributors:".to_string());
    list(
        &mut lines,
        &r.innersource_contributors,
        "No InnerSource contributors found.",
    );

    lines.push(String::new());
    lines.push("## Innersource Contribution Counts:".to_string());
    if r.innersource_counts.is_empty() {
        lines.push("No InnerSource contribution counts available.".to_string());
    }
    for t in &r.innersource_counts {
        lines.push(format!("- {}: {} contributions", t.author, t.count));
    }

    lines.push(String::new());
    lines.push("## Team Member Contribution Counts:".to_string());
    if r.team_counts.is_empty() {
        lines.push("No team member contribution counts available.".to_string());
    } else if r.team_counts.iter().all(|t| t.count == 0) {
        lines.push("No team member contributions found.".to_string());
    }
    for t in r.team_counts.iter().filter(|t| t.count > 0) {
        lines.push(format!("- {}: {} contributions", t.author, t.count));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn list(lines: &mut Vec<String>, items: &[String], empty: &str) {
    if items.is_empty() {
        lines.push(empty.to_string());
    }
    lines.extend(items.iter().map(|item| format!("- {item}")));
}

#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;
