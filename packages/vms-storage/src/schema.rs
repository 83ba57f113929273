pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_profiles.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_profiles.sql")),
				"tables/002_leads.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_leads.sql")),
				"tables/003_email_templates.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_email_templates.sql")),
				"tables/004_cadences.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_cadences.sql")),
				"tables/005_cadence_steps.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_cadence_steps.sql")),
				"tables/006_outreach_log.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_outreach_log.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn includes_are_expanded() {
		let sql = render_schema();

		assert!(!sql.contains("\\ir "));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS cadence_steps"));
		assert!(sql.contains("uq_cadences_one_active_per_lead"));
	}

	#[test]
	fn tables_are_created_before_their_references() {
		let sql = render_schema();
		let position = |needle: &str| sql.find(needle).unwrap_or(usize::MAX);

		assert!(position("TABLE IF NOT EXISTS leads") < position("TABLE IF NOT EXISTS cadences"));
		assert!(
			position("TABLE IF NOT EXISTS cadences") < position("TABLE IF NOT EXISTS cadence_steps")
		);
		assert!(
			position("TABLE IF NOT EXISTS cadence_steps")
				< position("TABLE IF NOT EXISTS outreach_log")
		);
	}
}
