pub const PROMPT: &str = "> ";

pub const BANNER: &str = "Projects dashboard. Type 'help' for commands.";

pub const HELP_LINES: &[&str] = &[
    "search <text>        filter by file name or id (empty clears)",
    "sort <key>           date-desc | date-asc | name-asc | name-desc",
    "open <id>            open the project in the editor",
    "download <id>        save the rendered PDF",
    "duplicate <id>       copy a project",
    "delete <id>          delete a project (asks first)",
    "upload <path.docx>   create a project from a Word document",
    "reload | retry       fetch the list again",
    "dismiss              hide the current message",
    "logout               forget stored credentials and quit",
    "quit                 leave the dashboard",
];

/// Path segment of the editor view under the backend origin.
pub const EDITOR_SEGMENT: &str = "ide";
