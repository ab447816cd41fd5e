//! Fixed option tables offered by the wizard.

use crate::answers::LabelSet;

/// A named group of services shown together in the picker and review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceCategory {
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

pub static SERVICE_CATEGORIES: [ServiceCategory; 4] = [
    ServiceCategory {
        key: "development",
        label: "Development",
        options: &[
            "Web Development",
            "Mobile Development",
            "Backend Development",
            "Frontend Development",
            "Full Stack Development",
        ],
    },
    ServiceCategory {
        key: "design",
        label: "Design",
        options: &[
            "UI Design",
            "UX Design",
            "Graphic Design",
            "Logo Design",
            "Brand Identity",
        ],
    },
    ServiceCategory {
        key: "marketing",
        label: "Marketing",
        options: &[
            "SEO Optimization",
            "Content Marketing",
            "Social Media Marketing",
            "Email Marketing",
            "PPC Advertising",
        ],
    },
    ServiceCategory {
        key: "consulting",
        label: "Consulting",
        options: &[
            "Business Strategy",
            "Product Strategy",
            "Market Research",
            "Competitive Analysis",
            "Digital Transformation",
        ],
    },
];

pub const AVAILABLE_SKILLS: [&str; 30] = [
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "HTML/CSS",
    "Python",
    "Java",
    "C#",
    "PHP",
    "Ruby",
    "Go",
    "Swift",
    "Kotlin",
    "SQL",
    "NoSQL",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "UI Design",
    "UX Design",
    "Product Management",
    "Agile",
    "Scrum",
    "DevOps",
    "Data Science",
    "Machine Learning",
    "Blockchain",
    "AR/VR",
];

pub const TIME_SLOTS: [&str; 17] = [
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM", "12:00 PM",
    "12:30 PM", "01:00 PM", "01:30 PM", "02:00 PM", "02:30 PM", "03:00 PM", "03:30 PM",
    "04:00 PM", "04:30 PM", "05:00 PM",
];

pub const TIMEZONES: [&str; 25] = [
    "UTC-12:00", "UTC-11:00", "UTC-10:00", "UTC-09:00", "UTC-08:00", "UTC-07:00", "UTC-06:00",
    "UTC-05:00", "UTC-04:00", "UTC-03:00", "UTC-02:00", "UTC-01:00", "UTC+00:00", "UTC+01:00",
    "UTC+02:00", "UTC+03:00", "UTC+04:00", "UTC+05:00", "UTC+06:00", "UTC+07:00", "UTC+08:00",
    "UTC+09:00", "UTC+10:00", "UTC+11:00", "UTC+12:00",
];

/// Every service in category order.
pub fn all_services() -> impl Iterator<Item = &'static str> {
    SERVICE_CATEGORIES
        .iter()
        .flat_map(|category| category.options.iter().copied())
}

pub fn category_of(service: &str) -> Option<&'static ServiceCategory> {
    SERVICE_CATEGORIES
        .iter()
        .find(|category| category.options.iter().any(|option| *option == service))
}

/// Services of `selected` grouped by category label, in category order.
/// Categories without a selection are left out, as are services that belong
/// to no known category.
pub fn group_services(selected: &LabelSet) -> Vec<(&'static str, Vec<String>)> {
    let mut groups: Vec<(usize, &'static str, Vec<String>)> = Vec::new();
    for service in selected.iter() {
        let Some(category) = category_of(service) else {
            continue;
        };
        match groups.iter_mut().find(|(_, label, _)| *label == category.label) {
            Some((_, _, chosen)) => chosen.push(service.to_string()),
            None => {
                let rank = SERVICE_CATEGORIES
                    .iter()
                    .position(|known| known.label == category.label)
                    .unwrap_or(usize::MAX);
                groups.push((rank, category.label, vec![service.to_string()]));
            }
        }
    }
    groups.sort_by_key(|(rank, _, _)| *rank);
    groups
        .into_iter()
        .map(|(_, label, chosen)| (label, chosen))
        .collect()
}

/// Case-insensitive substring filter over the service catalog. Categories
/// with no matching option are dropped.
pub fn search_services(term: &str) -> Vec<(&'static ServiceCategory, Vec<&'static str>)> {
    let needle = term.trim().to_lowercase();
    SERVICE_CATEGORIES
        .iter()
        .filter_map(|category| {
            let matches: Vec<&'static str> = category
                .options
                .iter()
                .copied()
                .filter(|option| option.to_lowercase().contains(&needle))
                .collect();
            if matches.is_empty() {
                None
            } else {
                Some((category, matches))
            }
        })
        .collect()
}

/// Finds the catalog entry matching `input` ignoring ASCII case.
pub fn lookup<'a>(input: &str, options: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let needle = input.trim();
    options
        .into_iter()
        .find(|option| option.eq_ignore_ascii_case(needle))
}

/// Closest option to `input`, used for "did you mean" hints.
pub fn suggest<'a>(input: &str, options: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    options
        .into_iter()
        .map(|option| (option, strsim::jaro_winkler(&needle, &option.to_lowercase())))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(option, _)| option)
}
