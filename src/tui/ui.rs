use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::clock::format_deadline;
use crate::models::TaskStatus;
use crate::overdue::{status, time_left};
use super::app::{App, FormField, InputMode};
use super::input::InputField;

const LABEL_WIDTH: u16 = 10;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Add form
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let now = app.now();
    let snapshot = app.view.borrow().clone();

    // Add form
    let adding = app.input_mode == InputMode::Adding;
    let (text, deadline) = if adding {
        (app.text_input.value.clone(), app.deadline_input.value.clone())
    } else {
        (
            snapshot.draft.text.clone(),
            snapshot.draft.deadline.as_ref().map(format_deadline).unwrap_or_default(),
        )
    };
    let focus = |field: FormField| adding && app.field == field;
    let form = Paragraph::new(vec![
        form_line("Task", &text, focus(FormField::Text)),
        form_line("Deadline", &deadline, focus(FormField::Deadline)),
    ])
    .block(Block::default().borders(Borders::ALL).title("New Task"));
    f.render_widget(form, chunks[0]);
    if adding {
        place_cursor(f, chunks[0], app.field, &app.text_input, &app.deadline_input);
    }

    // Task list
    let rows: Vec<Row> = snapshot
        .tasks
        .iter()
        .map(|t| {
            let st = status(t, now);
            let style = match st {
                TaskStatus::Done => Style::default().fg(Color::Green).add_modifier(Modifier::CROSSED_OUT),
                TaskStatus::Overdue => Style::default().fg(Color::Red),
                TaskStatus::Pending => Style::default(),
            };
            Row::new(vec![
                Cell::from(if t.done { "[x]" } else { "[ ]" }),
                Cell::from(t.text.clone()),
                Cell::from(t.deadline.as_ref().map(format_deadline).unwrap_or_default()),
                Cell::from(time_left(t, now)),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(12),
    ];

    let overdue = snapshot.tasks.iter().filter(|t| status(t, now) == TaskStatus::Overdue).count();
    let title = format!("Tasks ({} overdue)", overdue);
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Task", "Deadline", "Time Left"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | Space: Done | e: Edit | d: Del | j/k: Move",
        InputMode::Adding => "Enter: Add | Tab: Switch Field | Esc: Back",
        InputMode::Editing => "Enter: Save | Tab: Switch Field | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    // In-place editor
    if app.input_mode == InputMode::Editing {
        let area = centered_rect(60, 4, f.area());
        f.render_widget(Clear, area);
        let editor = Paragraph::new(vec![
            form_line("Task", &app.text_input.value, app.field == FormField::Text),
            form_line("Deadline", &app.deadline_input.value, app.field == FormField::Deadline),
        ])
        .block(Block::default().borders(Borders::ALL).title("Edit Task"));
        f.render_widget(editor, area);
        place_cursor(f, area, app.field, &app.text_input, &app.deadline_input);
    }
}

fn form_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH as usize), Style::default().fg(Color::Cyan)),
        Span::styled(value, value_style),
    ])
}

fn place_cursor(f: &mut Frame, area: Rect, field: FormField, text: &InputField, deadline: &InputField) {
    let (row, input) = match field {
        FormField::Text => (0, text),
        FormField::Deadline => (1, deadline),
    };
    f.set_cursor_position(cursor_position(area, row, input.cursor));
}

/// Screen cell for the cursor of an input on line `row` inside a bordered
/// `area`, clamped to the last column inside the border.
fn cursor_position(area: Rect, row: u16, cursor: usize) -> (u16, u16) {
    let x = area
        .x
        .saturating_add(1 + LABEL_WIDTH)
        .saturating_add(u16::try_from(cursor).unwrap_or(u16::MAX));
    let y = area.y.saturating_add(1 + row);
    (x.min(area.right().saturating_sub(2)), y)
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cursor_clamped_inside_border() {
        let area = Rect::new(0, 0, 40, 4);
        assert_eq!(cursor_position(area, 0, 3), (14, 1));
        assert_eq!(cursor_position(area, 1, 100), (38, 2));
        assert_eq!(cursor_position(area, 0, usize::MAX), (38, 1));
        let far = Rect::new(u16::MAX - 5, 0, 5, 4);
        assert_eq!(cursor_position(far, 0, 70_000), (far.right() - 2, 1));
    }

    #[test]
    fn test_overdue_task_is_counted_and_labelled() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let mut app = App::new(Box::new(FixedClock(now)));
        let deadline = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 0, 0);
        app.store.add("Buy milk", deadline, now).unwrap();

        let out = screen(&mut app);
        assert!(out.contains("Buy milk"));
        assert!(out.contains("01/01/2024 10:00"));
        assert!(out.contains("14h overdue"));
        assert!(out.contains("Tasks (1 overdue)"));
    }
}
