use dashboard_core::{DashboardViewModel, NoticeSeverity, Phase, ProjectCardView};

/// Text lines for one frame of the dashboard.
///
/// Exactly one of the loading, empty, error or card sections is drawn.
pub fn render(view: &DashboardViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let query = if view.query.is_empty() {
        String::new()
    } else {
        format!(" | search: \"{}\"", view.query)
    };
    lines.push(format!(
        "Projects ({}){} | sort: {}",
        view.total_count,
        query,
        view.sort_key.as_str()
    ));

    if let Some(notice) = &view.notice {
        let tag = match notice.severity {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Error => "error",
        };
        lines.push(format!("[{tag}] {} (type 'dismiss' to hide)", notice.text));
    }

    if let Some(upload) = &view.upload {
        lines.push(format!(
            "Uploading {} ... {}%",
            upload.file_name, upload.percent
        ));
    }

    match view.phase {
        Phase::Loading => lines.push("Loading projects...".to_string()),
        Phase::Empty if view.total_count > 0 => {
            lines.push(format!("No projects match \"{}\".", view.query));
        }
        Phase::Empty => {
            lines.push("No projects yet. Upload a .docx document to get started.".to_string());
        }
        Phase::Error => {
            let reason = view.load_error.as_deref().unwrap_or("unknown error");
            lines.push(format!("Could not load projects: {reason}"));
            lines.push("Type 'retry' to try again.".to_string());
        }
        Phase::Ready => {
            lines.extend(
                view.cards
                    .iter()
                    .enumerate()
                    .map(|(index, card)| format_card(index + 1, card)),
            );
        }
    }

    lines
}

fn format_card(position: usize, card: &ProjectCardView) -> String {
    format!(
        "{position:>3}. {title} [{status}] {created} (id: {id})",
        title = card.title,
        status = card.status_label,
        created = card.created_label,
        id = card.project_id
    )
}

pub fn delete_prompt(card: Option<&ProjectCardView>, project_id: &str) -> String {
    let title = card.map(|card| card.title.as_str()).unwrap_or(project_id);
    format!("Delete \"{title}\" ({project_id})? This cannot be undone. [y/N]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dashboard_core::{Notice, ProjectStatus, SortKey, UploadView};
    use pretty_assertions::assert_eq;

    fn view(phase: Phase) -> DashboardViewModel {
        DashboardViewModel {
            phase,
            query: String::new(),
            sort_key: SortKey::DateDesc,
            total_count: 0,
            cards: Vec::new(),
            load_error: None,
            notice: None,
            upload: None,
        }
    }

    fn card(id: &str, title: &str) -> ProjectCardView {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
        ProjectCardView {
            project_id: id.to_string(),
            title: title.to_string(),
            created_at,
            created_label: "Jan 5, 2024, 09:30 AM".to_string(),
            status: ProjectStatus::Completed,
            status_label: "Completed",
        }
    }

    #[test]
    fn loading_shows_only_indicator() {
        let mut loading = view(Phase::Loading);
        loading.total_count = 1;
        loading.cards = vec![card("p1", "Report.docx")];

        assert_eq!(
            render(&loading),
            vec![
                "Projects (1) | sort: date-desc".to_string(),
                "Loading projects...".to_string(),
            ]
        );
    }

    #[test]
    fn error_replaces_list_with_retry() {
        let mut failed = view(Phase::Error);
        failed.total_count = 1;
        failed.cards = vec![card("p1", "Report.docx")];
        failed.load_error = Some("network error: refused".to_string());

        let lines = render(&failed);

        assert_eq!(
            &lines[1..],
            &[
                "Could not load projects: network error: refused".to_string(),
                "Type 'retry' to try again.".to_string(),
            ]
        );
    }

    #[test]
    fn empty_distinguishes_no_data_from_no_match() {
        assert_eq!(
            render(&view(Phase::Empty))[1],
            "No projects yet. Upload a .docx document to get started."
        );

        let mut filtered = view(Phase::Empty);
        filtered.total_count = 3;
        filtered.query = "zzz".to_string();
        assert_eq!(
            render(&filtered),
            vec![
                "Projects (3) | search: \"zzz\" | sort: date-desc".to_string(),
                "No projects match \"zzz\".".to_string(),
            ]
        );
    }

    #[test]
    fn ready_lists_cards_in_order_with_notice_and_upload() {
        let mut ready = view(Phase::Ready);
        ready.total_count = 2;
        ready.sort_key = SortKey::NameAsc;
        ready.cards = vec![card("b", "Alpha.docx"), card("a", "Beta.docx")];
        ready.notice = Some(Notice {
            severity: NoticeSeverity::Info,
            text: "Project duplicated successfully!".to_string(),
        });
        ready.upload = Some(UploadView {
            file_name: "Draft.docx".to_string(),
            percent: 40,
        });

        assert_eq!(
            render(&ready),
            vec![
                "Projects (2) | sort: name-asc".to_string(),
                "[info] Project duplicated successfully! (type 'dismiss' to hide)".to_string(),
                "Uploading Draft.docx ... 40%".to_string(),
                "  1. Alpha.docx [Completed] Jan 5, 2024, 09:30 AM (id: b)".to_string(),
                "  2. Beta.docx [Completed] Jan 5, 2024, 09:30 AM (id: a)".to_string(),
            ]
        );
    }

    #[test]
    fn delete_prompt_names_the_project() {
        let target = card("p1", "Report.docx");
        assert_eq!(
            delete_prompt(Some(&target), "p1"),
            "Delete \"Report.docx\" (p1)? This cannot be undone. [y/N]"
        );
        assert_eq!(
            delete_prompt(None, "p9"),
            "Delete \"p9\" (p9)? This cannot be undone. [y/N]"
        );
    }
}
