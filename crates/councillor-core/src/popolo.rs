//! Conversion of a roster into Popolo person/organization JSON
//!
//! Each row becomes a person and a membership of its council. Councils and
//! parties become organizations whose ids are derived from their names.

use crate::error::Result;
use crate::table::Dataset;
use crate::writer::replace_file;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// A complete Popolo document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Popolo {
    pub persons: Vec<Person>,
    pub organizations: Vec<Organization>,
    pub memberships: Vec<Membership>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact_details: Vec<ContactDetail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub classification: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub person_id: String,
    pub organization_id: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_behalf_of_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
}

/// Build a Popolo document from a roster
///
/// Person ids come from `key_column`. Other fields are read by column name;
/// columns the roster lacks are treated as blank. The key and `name` columns
/// are required.
pub fn to_popolo(dataset: &Dataset, key_column: &str) -> Result<Popolo> {
    let id_idx = dataset.key_index(key_column)?;
    let name_idx = dataset.key_index("name")?;

    let mut popolo = Popolo::default();
    let mut councils: BTreeMap<String, Organization> = BTreeMap::new();
    let mut parties: BTreeMap<String, Organization> = BTreeMap::new();

    for (i, row) in dataset.rows.iter().enumerate() {
        let field = |column: &str| -> Option<String> {
            dataset
                .value(i, column)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let person_id = row.get(id_idx).unwrap_or_default().to_string();

        popolo.persons.push(Person {
            id: person_id.clone(),
            name: row.get(name_idx).unwrap_or_default().to_string(),
            email: field("email"),
            image: field("image"),
            contact_details: field("phone_mobile")
                .map(|value| ContactDetail {
                    kind: "cell".to_string(),
                    value,
                })
                .into_iter()
                .collect(),
            sources: field("source")
                .map(|url| Link { url, note: None })
                .into_iter()
                .collect(),
        });

        let council_id = field("council").map(|name| {
            let id = slugify(&name);
            let website = field("council website");
            let org = councils.entry(id.clone()).or_insert_with(|| Organization {
                id: id.clone(),
                name,
                classification: "legislature".to_string(),
                links: Vec::new(),
            });
            if let Some(url) = website {
                if !org.links.iter().any(|l| l.url == url) {
                    org.links.push(Link {
                        url,
                        note: Some("website".to_string()),
                    });
                }
            }
            id
        });

        let party_id = field("party").map(|name| {
            let id = format!("party/{}", slugify(&name));
            parties.entry(id.clone()).or_insert_with(|| Organization {
                id: id.clone(),
                name,
                classification: "party".to_string(),
                links: Vec::new(),
            });
            id
        });

        if let Some(organization_id) = council_id {
            popolo.memberships.push(Membership {
                person_id,
                organization_id,
                role: field("executive").unwrap_or_else(|| "councillor".to_string()),
                on_behalf_of_id: party_id,
                area: field("ward").map(|name| Area { name }),
                start_date: field("start_date"),
                end_date: field("end_date"),
            });
        }
    }

    popolo.organizations.extend(councils.into_values());
    popolo.organizations.extend(parties.into_values());

    tracing::debug!(
        persons = popolo.persons.len(),
        organizations = popolo.organizations.len(),
        memberships = popolo.memberships.len(),
        "built popolo document"
    );
    Ok(popolo)
}

/// Write a Popolo document as pretty-printed JSON, replacing `path` atomically
pub fn write_popolo<P: AsRef<Path>>(popolo: &Popolo, path: P) -> Result<()> {
    replace_file(path.as_ref(), |out| {
        serde_json::to_writer_pretty(&mut *out, popolo)?;
        out.write_all(b"\n")?;
        Ok(())
    })
}

/// Lower-case identifier made of alphanumerics joined by underscores
///
/// A name with no alphanumerics at all is encoded as the hex of its bytes so
/// that distinct names never share an id.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug = name.bytes().map(|b| format!("{b:02x}")).collect();
    }
    slug
}
