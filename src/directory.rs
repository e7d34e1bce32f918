use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunicationMethod {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub sequence: u32,
    pub mandatory: bool,
}

const COMMUNICATION_METHODS: &[CommunicationMethod] = &[
    CommunicationMethod {
        id: 1,
        name: "LinkedIn Post",
        description: "Public post mentioning the company",
        sequence: 1,
        mandatory: true,
    },
    CommunicationMethod {
        id: 2,
        name: "LinkedIn Message",
        description: "Direct message to a contact",
        sequence: 2,
        mandatory: true,
    },
    CommunicationMethod {
        id: 3,
        name: "Email",
        description: "Email to a registered address",
        sequence: 3,
        mandatory: true,
    },
    CommunicationMethod {
        id: 4,
        name: "Phone Call",
        description: "Call to a registered number",
        sequence: 4,
        mandatory: false,
    },
    CommunicationMethod {
        id: 5,
        name: "Other",
        description: "Any other form of contact",
        sequence: 5,
        mandatory: false,
    },
];

pub fn communication_methods() -> &'static [CommunicationMethod] {
    COMMUNICATION_METHODS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub linkedin_profile: Option<String>,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub comments: String,
    pub periodicity_days: u32,
}

/// Unvalidated input for creating or replacing a company, one string per
/// form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompanyForm {
    pub name: String,
    pub location: String,
    #[serde(alias = "linkedin_profile")]
    pub linkedin: String,
    pub email: String,
    pub phone: String,
    pub comments: String,
    #[serde(deserialize_with = "string_or_number")]
    pub periodicity: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(d)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::invalid_field(field, "required"))
    } else {
        Ok(value.to_owned())
    }
}

impl CompanyForm {
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "name" => &mut self.name,
            "location" => &mut self.location,
            "linkedin" | "linkedin_profile" => &mut self.linkedin,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "comments" | "comment" => &mut self.comments,
            "periodicity" => &mut self.periodicity,
            _ => {
                return Err(Error::new(
                    ErrorKind::CommandParse,
                    &format!("unknown company field '{}'", key),
                ))
            }
        };
        *slot = value.trim().to_owned();
        Ok(())
    }

    fn validate(&self, id: Uuid) -> Result<Company> {
        let name = required("name", &self.name)?;
        let location = required("location", &self.location)?;

        let linkedin = self.linkedin.trim();
        let linkedin_profile = if linkedin.is_empty() {
            None
        } else if linkedin.starts_with("https://") || linkedin.starts_with("http://") {
            Some(linkedin.to_owned())
        } else {
            return Err(Error::invalid_field("linkedin", "must be an http(s) URL"));
        };

        let email = required("email", &self.email)?;
        if !email.contains('@') {
            return Err(Error::invalid_field("email", "must contain '@'"));
        }
        let phone = required("phone", &self.phone)?;

        let periodicity_days = required("periodicity", &self.periodicity)?
            .parse::<u32>()
            .ok()
            .filter(|days| *days >= 1)
            .ok_or_else(|| Error::invalid_field("periodicity", "must be a whole number of days >= 1"))?;

        Ok(Company {
            id,
            name,
            location,
            linkedin_profile,
            emails: vec![email],
            phone_numbers: vec![phone],
            comments: self.comments.trim().to_owned(),
            periodicity_days,
        })
    }
}

impl From<&Company> for CompanyForm {
    fn from(company: &Company) -> Self {
        CompanyForm {
            name: company.name.clone(),
            location: company.location.clone(),
            linkedin: company.linkedin_profile.clone().unwrap_or_default(),
            email: company.emails.first().cloned().unwrap_or_default(),
            phone: company.phone_numbers.first().cloned().unwrap_or_default(),
            comments: company.comments.clone(),
            periodicity: company.periodicity_days.to_string(),
        }
    }
}

/// Owns the company list of the admin screen.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    companies: Vec<Company>,
    editing: Option<Uuid>,
}

impl Directory {
    pub fn new() -> Self {
        Directory::default()
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn get(&self, id: &Uuid) -> Option<&Company> {
        self.companies.iter().find(|c| &c.id == id)
    }

    pub fn editing(&self) -> Option<&Uuid> {
        self.editing.as_ref()
    }

    pub fn add(&mut self, form: &CompanyForm) -> Result<&Company> {
        let company = form.validate(Uuid::new_v4())?;
        log::info!("Adding company '{}' ({})", company.name, company.id);
        self.companies.push(company);

        // just pushed
        Ok(&self.companies[self.companies.len() - 1])
    }

    pub fn remove(&mut self, id: &Uuid) -> Result<Company> {
        let pos = self
            .companies
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| Error::new(ErrorKind::UnknownCompany, &id.to_string()))?;

        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }

        let company = self.companies.remove(pos);
        log::info!("Removed company '{}' ({})", company.name, company.id);
        Ok(company)
    }

    /// Marks `id` as being edited and returns its current values.
    pub fn begin_edit(&mut self, id: &Uuid) -> Result<CompanyForm> {
        let form = self
            .get(id)
            .map(CompanyForm::from)
            .ok_or_else(|| Error::new(ErrorKind::UnknownCompany, &id.to_string()))?;
        self.editing = Some(*id);
        Ok(form)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Replaces the company being edited. Its identifier is kept.
    pub fn commit_edit(&mut self, form: &CompanyForm) -> Result<&Company> {
        let id = self.editing.ok_or_else(|| {
            Error::new(ErrorKind::UnknownCompany, "no company is being edited")
        })?;
        let pos = self
            .companies
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::new(ErrorKind::UnknownCompany, &id.to_string()))?;

        let company = form.validate(id)?;
        log::info!("Replacing company '{}' ({})", company.name, id);
        self.companies[pos] = company;
        self.editing = None;

        Ok(&self.companies[pos])
    }
}
