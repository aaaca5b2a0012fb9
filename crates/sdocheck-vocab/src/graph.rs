//! In-memory schema.org vocabulary graph

use crate::model::{ClassTerm, EnumerationMember, PropertyTerm, Term, TermKind};
use crate::{iri, normalize_id, VocabError, Vocabulary};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Collects raw declarations; [`VocabularyBuilder::build`] classifies them and
/// computes the hierarchy closures.
#[derive(Debug, Default, Clone)]
pub struct VocabularyBuilder {
    /// class -> (declared superclasses, explicitly typed as schema:DataType)
    classes: BTreeMap<String, (BTreeSet<String>, bool)>,
    properties: BTreeMap<String, PropertyTerm>,
    instances: BTreeMap<String, BTreeSet<String>>,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class with its direct superclasses
    pub fn class<I, S>(&mut self, id: &str, super_classes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.classes.entry(normalize_id(id)).or_default();
        entry.0.extend(super_classes.into_iter().map(|s| normalize_id(s.as_ref())));
        self
    }

    /// Declare a data type (`@type` includes `schema:DataType`)
    pub fn data_type<I, S>(&mut self, id: &str, super_classes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.class(id, super_classes);
        if let Some(entry) = self.classes.get_mut(&normalize_id(id)) {
            entry.1 = true;
        }
        self
    }

    pub fn property<D, R, S>(&mut self, id: &str, domains: D, ranges: R) -> &mut Self
    where
        D: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = normalize_id(id);
        let entry = self.properties.entry(id.clone()).or_insert_with(|| PropertyTerm::new(id));
        entry.domains.extend(domains.into_iter().map(|s| normalize_id(s.as_ref())));
        entry.ranges.extend(ranges.into_iter().map(|s| normalize_id(s.as_ref())));
        self
    }

    /// Declare a typed individual (`schema:Monday a schema:DayOfWeek`)
    pub fn instance<I, S>(&mut self, id: &str, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.instances
            .entry(normalize_id(id))
            .or_default()
            .extend(types.into_iter().map(|s| normalize_id(s.as_ref())));
        self
    }

    pub fn build(&self) -> SchemaVocabulary {
        let declared: HashMap<String, BTreeSet<String>> = self
            .classes
            .iter()
            .map(|(id, (supers, _))| {
                let known = supers.iter().filter(|s| self.classes.contains_key(*s)).cloned().collect();
                (id.clone(), known)
            })
            .collect();

        let ancestors = compute_hierarchy_closure(&declared);

        let is_data_type = |id: &str| -> bool {
            let marked = |c: &str| c == iri::DATA_TYPE || self.classes.get(c).map(|(_, dt)| *dt).unwrap_or(false);
            marked(id) || ancestors.get(id).map(|a| a.iter().any(|c| marked(c.as_str()))).unwrap_or(false)
        };

        let mut classes: BTreeMap<String, ClassTerm> = BTreeMap::new();
        for id in self.classes.keys() {
            let kind = if is_data_type(id.as_str()) {
                TermKind::DataType
            } else if ancestors.get(id).map(|a| a.contains(iri::ENUMERATION)).unwrap_or(false) {
                TermKind::Enumeration
            } else {
                TermKind::Class
            };
            let mut term = ClassTerm::new(id.clone(), kind);
            term.super_classes = declared.get(id).cloned().unwrap_or_default();
            classes.insert(id.clone(), term);
        }

        for (id, supers) in &declared {
            for parent in supers {
                if let Some(parent_term) = classes.get_mut(parent) {
                    parent_term.sub_classes.insert(id.clone());
                }
            }
        }

        for property in self.properties.values() {
            for domain in &property.domains {
                if let Some(class) = classes.get_mut(domain) {
                    class.properties.insert(property.id.clone());
                }
            }
        }

        let mut members = BTreeMap::new();
        for (id, types) in &self.instances {
            let known: BTreeSet<String> = types.iter().filter(|t| classes.contains_key(*t)).cloned().collect();
            if known.is_empty() {
                continue;
            }
            for t in &known {
                if let Some(class) = classes.get_mut(t) {
                    class.members.insert(id.clone());
                }
            }
            members.insert(id.clone(), EnumerationMember { id: id.clone(), types: known });
        }

        let mut descendants: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (child, parents) in &ancestors {
            for parent in parents {
                descendants.entry(parent.clone()).or_default().insert(child.clone());
            }
        }

        let list = |kind: TermKind| -> Vec<String> {
            classes.values().filter(|c| c.kind == kind).map(|c| c.id.clone()).collect()
        };
        let class_list = list(TermKind::Class);
        let enumeration_list = list(TermKind::Enumeration);
        let data_type_list = list(TermKind::DataType);
        let property_list = self.properties.keys().cloned().collect();

        let vocabulary = SchemaVocabulary {
            classes,
            properties: self.properties.clone(),
            members,
            class_list,
            property_list,
            enumeration_list,
            data_type_list,
            ancestors,
            descendants,
        };

        debug!(
            classes = vocabulary.class_list.len(),
            enumerations = vocabulary.enumeration_list.len(),
            data_types = vocabulary.data_type_list.len(),
            properties = vocabulary.property_list.len(),
            "Built vocabulary graph"
        );

        vocabulary
    }
}

/// Transitive closure of a child -> direct parents relation
fn compute_hierarchy_closure(direct: &HashMap<String, BTreeSet<String>>) -> HashMap<String, BTreeSet<String>> {
    let mut closure = direct.clone();
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot = closure.clone();
        for (child, parents) in closure.iter_mut() {
            let inherited: Vec<String> = parents
                .iter()
                .filter_map(|p| snapshot.get(p))
                .flatten()
                .filter(|g| *g != child)
                .cloned()
                .collect();
            for grand_parent in inherited {
                if parents.insert(grand_parent) {
                    changed = true;
                }
            }
        }
    }
    closure
}

/// Immutable schema.org vocabulary with precomputed subclass closures
#[derive(Debug, Clone)]
pub struct SchemaVocabulary {
    classes: BTreeMap<String, ClassTerm>,
    properties: BTreeMap<String, PropertyTerm>,
    members: BTreeMap<String, EnumerationMember>,
    class_list: Vec<String>,
    property_list: Vec<String>,
    enumeration_list: Vec<String>,
    data_type_list: Vec<String>,
    /// class -> all superclasses
    ancestors: HashMap<String, BTreeSet<String>>,
    /// class -> all subclasses
    descendants: HashMap<String, BTreeSet<String>>,
}

impl SchemaVocabulary {
    pub fn builder() -> VocabularyBuilder {
        VocabularyBuilder::new()
    }

    /// Number of terms of every kind
    pub fn len(&self) -> usize {
        self.classes.len() + self.properties.len() + self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_descendants(&self, ids: &BTreeSet<String>) -> BTreeSet<String> {
        let mut all = ids.clone();
        for id in ids {
            if let Some(sub) = self.descendants.get(id) {
                all.extend(sub.iter().cloned());
            }
        }
        all
    }

    fn kind_of(&self, id: &str) -> Option<TermKind> {
        self.term(id).ok().map(|t| t.kind())
    }
}

impl Vocabulary for SchemaVocabulary {
    fn classes(&self) -> &[String] {
        &self.class_list
    }

    fn properties(&self) -> &[String] {
        &self.property_list
    }

    fn enumerations(&self) -> &[String] {
        &self.enumeration_list
    }

    fn data_types(&self) -> &[String] {
        &self.data_type_list
    }

    fn class(&self, id: &str) -> Result<&ClassTerm, VocabError> {
        let id = normalize_id(id);
        self.classes.get(&id).ok_or(VocabError::NotFound(id))
    }

    fn property(&self, id: &str) -> Result<&PropertyTerm, VocabError> {
        let id = normalize_id(id);
        self.properties.get(&id).ok_or(VocabError::NotFound(id))
    }

    fn term(&self, id: &str) -> Result<Term<'_>, VocabError> {
        let id = normalize_id(id);
        if let Some(class) = self.classes.get(&id) {
            return Ok(Term::Class(class));
        }
        if let Some(property) = self.properties.get(&id) {
            return Ok(Term::Property(property));
        }
        if let Some(member) = self.members.get(&id) {
            return Ok(Term::Member(member));
        }
        Err(VocabError::NotFound(id))
    }

    fn class_properties(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError> {
        let class = self.class(id)?;
        let mut properties = class.properties.clone();
        if inherited {
            for ancestor in self.ancestors.get(&class.id).into_iter().flatten() {
                if let Some(parent) = self.classes.get(ancestor) {
                    properties.extend(parent.properties.iter().cloned());
                }
            }
        }
        Ok(properties.into_iter().collect())
    }

    fn sub_classes(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError> {
        let class = self.class(id)?;
        if inherited {
            Ok(self.descendants.get(&class.id).into_iter().flatten().cloned().collect())
        } else {
            Ok(class.sub_classes.iter().cloned().collect())
        }
    }

    fn super_classes(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError> {
        let class = self.class(id)?;
        if inherited {
            Ok(self.ancestors.get(&class.id).into_iter().flatten().cloned().collect())
        } else {
            Ok(class.super_classes.iter().cloned().collect())
        }
    }

    fn domains(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError> {
        let property = self.property(id)?;
        let domains = if inherited {
            self.with_descendants(&property.domains)
        } else {
            property.domains.clone()
        };
        Ok(domains.into_iter().collect())
    }

    fn ranges(&self, id: &str, inherited: bool, filter: Option<&[TermKind]>) -> Result<Vec<String>, VocabError> {
        let property = self.property(id)?;
        let ranges = if inherited {
            self.with_descendants(&property.ranges)
        } else {
            property.ranges.clone()
        };
        Ok(ranges
            .into_iter()
            .filter(|r| match filter {
                Some(kinds) => self.kind_of(r).map(|k| kinds.contains(&k)).unwrap_or(false),
                None => true,
            })
            .collect())
    }

    fn enumeration_members(&self, id: &str) -> Result<Vec<String>, VocabError> {
        let class = self.class(id)?;
        let mut members = class.members.clone();
        for sub in self.descendants.get(&class.id).into_iter().flatten() {
            if let Some(sub_class) = self.classes.get(sub) {
                members.extend(sub_class.members.iter().cloned());
            }
        }
        Ok(members.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> SchemaVocabulary {
        let mut builder = VocabularyBuilder::new();
        builder
            .class("schema:Thing", Vec::<&str>::new())
            .class("schema:Person", ["schema:Thing"])
            .class("schema:Organization", ["schema:Thing"])
            .class("schema:SportsTeam", ["schema:Organization"])
            .class("http://schema.org/Intangible", ["schema:Thing"])
            .class("schema:Enumeration", ["schema:Intangible"])
            .class("schema:DayOfWeek", ["schema:Enumeration"])
            .class("schema:DataType", ["rdfs:Class"])
            .data_type("schema:Text", Vec::<&str>::new())
            .class("schema:URL", ["schema:Text"])
            .property("schema:name", ["schema:Thing"], ["schema:Text"])
            .property("schema:athlete", ["schema:SportsTeam"], ["schema:Person"])
            .property("schema:dayOfWeek", ["schema:Intangible"], ["schema:DayOfWeek"])
            .property("schema:member", ["schema:Organization"], ["schema:Organization", "schema:Person", "schema:Text"])
            .instance("schema:Monday", ["schema:DayOfWeek"])
            .instance("schema:Unrelated", ["ex:Nothing"]);
        builder.build()
    }

    #[test]
    fn test_classification() {
        let vocab = sample();
        assert_eq!(
            vocab.classes(),
            &["schema:Enumeration", "schema:Intangible", "schema:Organization", "schema:Person", "schema:SportsTeam", "schema:Thing"]
        );
        assert_eq!(vocab.enumerations(), &["schema:DayOfWeek"]);
        assert_eq!(vocab.data_types(), &["schema:DataType", "schema:Text", "schema:URL"]);
        assert!(vocab.is_class_or_enumeration("schema:DayOfWeek"));
        assert!(!vocab.is_class_or_enumeration("schema:Text"));
        assert_eq!(vocab.term("schema:Monday").unwrap().kind(), TermKind::EnumerationMember);
        assert!(matches!(vocab.term("schema:Unrelated"), Err(VocabError::NotFound(_))));
    }

    #[test]
    fn test_transitive_closure() {
        let vocab = sample();
        assert_eq!(
            vocab.sub_classes("schema:Thing", true).unwrap(),
            vec!["schema:DayOfWeek", "schema:Enumeration", "schema:Intangible", "schema:Organization", "schema:Person", "schema:SportsTeam"]
        );
        assert_eq!(vocab.sub_classes("schema:Thing", false).unwrap().len(), 3);
        assert_eq!(
            vocab.super_classes("schema:SportsTeam", true).unwrap(),
            vec!["schema:Organization", "schema:Thing"]
        );
    }

    #[test]
    fn test_inherited_properties() {
        let vocab = sample();
        assert_eq!(vocab.class_properties("schema:SportsTeam", false).unwrap(), vec!["schema:athlete"]);
        assert_eq!(
            vocab.class_properties("schema:SportsTeam", true).unwrap(),
            vec!["schema:athlete", "schema:member", "schema:name"]
        );
        assert!(!vocab.class_properties("schema:Person", true).unwrap().contains(&"schema:athlete".to_string()));
    }

    #[test]
    fn test_domains_and_ranges() {
        let vocab = sample();
        assert_eq!(
            vocab.domains("schema:member", true).unwrap(),
            vec!["schema:Organization", "schema:SportsTeam"]
        );
        assert_eq!(
            vocab.ranges("schema:member", false, Some(&[TermKind::Class, TermKind::Enumeration])).unwrap(),
            vec!["schema:Organization", "schema:Person"]
        );
        assert_eq!(vocab.ranges("schema:member", false, None).unwrap().len(), 3);
        assert_eq!(vocab.ranges("http://schema.org/name", true, None).unwrap(), vec!["schema:Text", "schema:URL"]);
    }

    #[test]
    fn test_enumeration_members() {
        let vocab = sample();
        assert_eq!(vocab.enumeration_members("schema:DayOfWeek").unwrap(), vec!["schema:Monday"]);
        assert_eq!(vocab.enumeration_members("schema:Enumeration").unwrap(), vec!["schema:Monday"]);
    }

    #[test]
    fn test_not_found() {
        let vocab = sample();
        assert!(matches!(vocab.class("schema:Nope"), Err(VocabError::NotFound(id)) if id == "schema:Nope"));
        assert!(vocab.property("schema:Person").is_err());
    }

    proptest! {
        #[test]
        fn prop_chain_closure(len in 1usize..30) {
            let mut builder = VocabularyBuilder::new();
            builder.class("schema:C0", Vec::<&str>::new());
            for i in 1..len {
                builder.class(&format!("schema:C{}", i), [format!("schema:C{}", i - 1)]);
            }
            let vocab = builder.build();
            let last = format!("schema:C{}", len - 1);
            prop_assert_eq!(vocab.super_classes(&last, true).unwrap().len(), len - 1);
            prop_assert_eq!(vocab.sub_classes("schema:C0", true).unwrap().len(), len - 1);
        }
    }

    #[test]
    fn test_closure_handles_cycles() {
        let mut builder = VocabularyBuilder::new();
        builder.class("schema:A", ["schema:B"]).class("schema:B", ["schema:A"]);
        let vocab = builder.build();
        assert_eq!(vocab.super_classes("schema:A", true).unwrap(), vec!["schema:B"]);
    }
}
