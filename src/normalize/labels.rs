//! Display labels for request fields reported by backend validation.

/// Known request fields and the label shown to users.
const FIELD_LABELS: &[(&str, &str)] = &[
    // auth
    ("username", "Username"),
    ("email", "Email"),
    ("password", "Password"),
    // travel plans
    ("title", "Title"),
    ("destination", "Destination"),
    ("start_date", "Start date"),
    ("end_date", "End date"),
    ("days", "Days"),
    ("budget", "Budget"),
    ("travelers_count", "Travelers"),
    ("preferences", "Preferences"),
    ("feedback", "Feedback"),
    // expenses
    ("travel_plan_id", "Trip"),
    ("category", "Category"),
    ("amount", "Amount"),
    ("description", "Description"),
    ("expense_date", "Expense date"),
    // voice
    ("audio", "Audio file"),
    ("audio_data", "Audio data"),
    ("format", "Audio format"),
    ("text", "Text"),
    // map
    ("address", "Address"),
    ("query", "Search keyword"),
    ("city", "City"),
    ("origin", "Origin"),
    ("mode", "Travel mode"),
];

/// Returns the display label for `field`, or `field` itself when it is not a known field.
pub fn field_label(field: &str) -> &str {
    FIELD_LABELS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| *label)
        .unwrap_or(field)
}
