use super::{
    DONE_SUFFIX, Decision, INSTRUCTIONS, LOCATION_PREFIX, NO_DUE, PROPOSED_PREFIX, RECORD_INDENT,
    REASON_PREFIX, REVIEW_PREFIX, TOP_OF_DOCUMENT, strip_block,
};
use crate::layout::NoteLayout;
use crate::proposal::TaskProposal;

/// Render the lines of one record
///
/// Line numbers are written 1-indexed; the proposal stores them 0-indexed.
pub fn render_record(proposal: &TaskProposal, decision: Decision) -> Vec<String> {
    let due = proposal
        .due
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NO_DUE.to_string());
    let section = proposal
        .source
        .section
        .as_deref()
        .unwrap_or(TOP_OF_DOCUMENT);
    let done = if proposal.source.checkbox.is_filled() {
        DONE_SUFFIX
    } else {
        ""
    };

    let mut lines = vec![
        format!("- [{}] {}", decision.marker(), proposal.description),
        format!(
            "{RECORD_INDENT}{PROPOSED_PREFIX} {} | due: {} | priority: {}",
            proposal.description, due, proposal.priority
        ),
        format!(
            "{RECORD_INDENT}{LOCATION_PREFIX} {}, line {}{}",
            section,
            proposal.source.line_number + 1,
            done
        ),
    ];

    if let Some(reason) = &proposal.priority_reason {
        lines.push(format!("{RECORD_INDENT}{REASON_PREFIX} {}", reason));
    }
    if proposal.needs_review {
        let reason = proposal.review_reason.as_deref().unwrap_or("unclear");
        lines.push(format!("{RECORD_INDENT}{REVIEW_PREFIX} {}", reason));
    }
    lines
}

/// Render a complete TBD block for `proposals`, every record unmarked
pub fn render_block(proposals: &[TaskProposal], layout: &NoteLayout) -> String {
    let mut lines = vec![layout.tbd_header(), INSTRUCTIONS.to_string()];
    for proposal in proposals {
        lines.push(String::new());
        lines.extend(render_record(proposal, Decision::Unmarked));
    }
    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Replace any TBD block in `note` with a fresh one at the end of the note
///
/// With no proposals the old block is only removed.
pub fn replace_block(note: &str, proposals: &[TaskProposal], layout: &NoteLayout) -> String {
    let stripped = strip_block(note, layout);
    if proposals.is_empty() {
        return stripped;
    }

    let mut text = stripped.trim_end().to_string();
    if !text.is_empty() {
        text.push_str("\n\n");
    }
    text.push_str(&render_block(proposals, layout));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::Priority;
    use crate::scanner::{Checkbox, InformalTask};
    use chrono::NaiveDate;

    fn proposal(description: &str) -> TaskProposal {
        TaskProposal {
            source: InformalTask {
                text: format!("{} today", description),
                line_number: 3,
                section: Some("Inbox".to_string()),
                checkbox: Checkbox::Unfilled,
                original_line: format!("- [ ] {} today", description),
            },
            description: description.to_string(),
            due: NaiveDate::from_ymd_opt(2025, 10, 7),
            priority: Priority::low,
            project: None,
            tags: Vec::new(),
            priority_reason: None,
            needs_review: false,
            review_reason: None,
        }
    }

    #[test]
    fn test_render_record_lines() {
        let lines = render_record(&proposal("call mom"), Decision::Unmarked);
        assert_eq!(
            lines,
            vec![
                "- [ ] call mom",
                "    - proposed: call mom | due: 2025-10-07 | priority: low",
                "    - location: Inbox, line 4",
            ]
        );
    }

    #[test]
    fn test_render_record_optional_lines() {
        let mut p = proposal("fix server");
        p.due = None;
        p.priority = Priority::high;
        p.priority_reason = Some("priority keyword \"urgent\"".to_string());
        p.needs_review = true;
        p.review_reason = Some("could not parse date".to_string());
        p.source.section = None;
        p.source.checkbox = Checkbox::Filled('X');

        let lines = render_record(&p, Decision::Approved);
        assert_eq!(lines[0], "- [a] fix server");
        assert!(lines[1].ends_with("due: none | priority: high"));
        assert_eq!(lines[2], "    - location: top of document, line 4 (done)");
        assert_eq!(lines[3], "    - reason: priority keyword \"urgent\"");
        assert_eq!(lines[4], "    - needs review: could not parse date");
    }

    #[test]
    fn test_replace_block_never_duplicates() {
        let layout = NoteLayout::default();
        let note = "# Note\n- [ ] call mom today\n";
        let proposals = vec![proposal("call mom")];

        let once = replace_block(note, &proposals, &layout);
        let twice = replace_block(&once, &proposals, &layout);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("## TBD: Proposed Tasks").count(), 1);
    }

    #[test]
    fn test_replace_block_with_no_proposals_removes_block() {
        let layout = NoteLayout::default();
        let note = replace_block("# Note\n", &[proposal("a")], &layout);
        assert_eq!(replace_block(&note, &[], &layout), "# Note\n");
    }
}
