pub const COMPANY_NAME: &str = "{{company_name}}";
pub const CONTACT_NAME: &str = "{{contact_name}}";
pub const EQUIPMENT_TYPE: &str = "{{equipment_type}}";

const DEFAULT_COMPANY_NAME: &str = "your company";
const DEFAULT_CONTACT_NAME: &str = "there";
const DEFAULT_EQUIPMENT_TYPE: &str = "equipment";

/// Lead fields consulted by merge fields.
#[derive(Debug, Clone, Copy)]
pub struct MergeLead<'a> {
	pub company_name: &'a str,
	pub contact_name: Option<&'a str>,
	pub equipment_types: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeValues {
	pub company_name: String,
	pub contact_name: String,
	pub equipment_type: String,
}
impl MergeValues {
	pub fn from_lead(lead: MergeLead<'_>) -> Self {
		Self {
			company_name: non_blank(Some(lead.company_name))
				.unwrap_or(DEFAULT_COMPANY_NAME)
				.to_string(),
			contact_name: non_blank(lead.contact_name).unwrap_or(DEFAULT_CONTACT_NAME).to_string(),
			equipment_type: lead
				.equipment_types
				.first()
				.map(|tag| tag.replace('_', " "))
				.filter(|tag| !tag.trim().is_empty())
				.unwrap_or_else(|| DEFAULT_EQUIPMENT_TYPE.to_string()),
		}
	}

	pub fn render(&self, text: &str) -> String {
		text.replace(COMPANY_NAME, &self.company_name)
			.replace(CONTACT_NAME, &self.contact_name)
			.replace(EQUIPMENT_TYPE, &self.equipment_type)
	}
}

pub fn render(text: &str, lead: MergeLead<'_>) -> String {
	MergeValues::from_lead(lead).render(text)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.trim().is_empty())
}
