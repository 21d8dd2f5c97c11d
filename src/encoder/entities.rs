//! Регистрация классов, интерфейсов, методов и полей.
//!
//! Only direct supertype edges are written; transitive closure belongs to
//! the downstream rules.

use super::representation;
use super::FactWriter;
use crate::core::Result;
use crate::facts::{Database, PredicateFile};
use crate::ir::{Class, Field, Method, Modifier};

impl<D: Database> FactWriter<D> {
    /// Идентификатор метода без записи фактов
    pub fn method_id(&self, method: &Method) -> String {
        self.signature_id(&representation::method_signature(method))
    }

    /// `METHOD(id, name, descriptor, declaringType, returnType, rawDescriptor)`.
    ///
    /// Parameter types go through the type normalizer too, so array
    /// parameters get their `ARRAY_TYPE` chains.
    pub fn register_method(&self, method: &Method) -> Result<String> {
        let return_type = self.type_id(&method.return_type)?;
        for param in &method.params {
            self.type_id(param)?;
        }
        let declaring = self.class_type_id(&method.declaring_class);
        let id = self.encode_signature(&representation::method_signature(method));

        self.add(
            PredicateFile::Method,
            &[
                &id,
                &method.name,
                &representation::method_descriptor(method),
                &declaring,
                &return_type,
                &representation::raw_descriptor(method),
            ],
        );
        Ok(id)
    }

    /// `FIELD_SIGNATURE(id, declaringType, name, fieldType)`
    pub fn register_field(&self, field: &Field) -> Result<String> {
        let id = representation::field_signature(field);
        let declaring = self.class_type_id(&field.declaring_class);
        let field_type = self.type_id(&field.field_type)?;
        self.add(
            PredicateFile::FieldSignature,
            &[&id, &declaring, &field.name, &field_type],
        );
        Ok(id)
    }

    /// Kind marker plus `CLASS_HEAP(<class T>, T)`.
    pub fn register_class_or_interface(&self, class: &Class) -> String {
        let type_id = self.register_class_kind(class);
        let heap = representation::class_constant_id(&type_id);
        self.add(PredicateFile::ClassHeap, &[&heap, &type_id]);
        type_id
    }

    fn register_class_kind(&self, class: &Class) -> String {
        let type_id = self.class_type_id(&class.name);
        let marker = if class.is_interface {
            PredicateFile::InterfaceType
        } else {
            PredicateFile::ClassType
        };
        self.add(marker, &[&type_id]);
        type_id
    }

    pub fn register_superclass(&self, class: &Class, superclass: &str) {
        self.add(
            PredicateFile::DirectSuperClass,
            &[&self.class_type_id(&class.name), &self.class_type_id(superclass)],
        );
    }

    pub fn register_superinterface(&self, class: &Class, interface: &str) {
        self.add(
            PredicateFile::DirectSuperIface,
            &[&self.class_type_id(&class.name), &self.class_type_id(interface)],
        );
    }

    pub fn register_field_modifier(&self, modifier: Modifier, field: &Field) {
        let id = representation::field_signature(field);
        self.add(PredicateFile::FieldModifier, &[modifier.as_str(), &id]);
    }

    /// Re-emits the kind marker; the sink deduplicates it.
    pub fn register_class_modifier(&self, modifier: Modifier, class: &Class) {
        let type_id = self.register_class_kind(class);
        self.add(PredicateFile::ClassModifier, &[modifier.as_str(), &type_id]);
    }

    pub fn register_method_modifier(&self, modifier: Modifier, method: &Method) {
        let id = self.method_id(method);
        self.add(PredicateFile::MethodModifier, &[modifier.as_str(), &id]);
    }

    pub fn register_application_class(&self, class: &Class) {
        self.add(PredicateFile::AppClass, &[&self.class_type_id(&class.name)]);
    }

    /// `CLASS_ARTIFACT(artifact, type)`
    pub fn register_class_artifact(&self, artifact: &str, class: &Class) {
        self.add(
            PredicateFile::ClassArtifact,
            &[artifact, &self.class_type_id(&class.name)],
        );
    }

    /// Запись файла свойств: каждая часть кодируется как строковая константа
    pub fn register_property(&self, path: &str, key: &str, value: &str) {
        let path_id = self.encode_string_constant(path);
        let key_id = self.encode_string_constant(key);
        let value_id = self.encode_string_constant(value);
        self.add(PredicateFile::Properties, &[&path_id, &key_id, &value_id]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EncodeError;
    use crate::facts::MemoryDatabase;
    use crate::ir::{PrimitiveType, TypeRef};
    use pretty_assertions::assert_eq;

    fn writer() -> FactWriter<MemoryDatabase> {
        FactWriter::new(MemoryDatabase::new())
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_register_method() {
        let w = writer();
        let m = Method::new(
            "demo.Main",
            "copy",
            vec![TypeRef::array_of(PrimitiveType::Char.into())],
            PrimitiveType::Int.into(),
        );
        let id = w.register_method(&m).unwrap();
        assert_eq!(id, "<demo.Main: int copy(char[])>");
        assert_eq!(id, w.method_id(&m));

        let db = w.database();
        assert_eq!(
            db.facts(PredicateFile::Method),
            vec![row(&[&id, "copy", "int(char[])", "demo.Main", "int", "([C)I"])]
        );
        assert!(db.contains(PredicateFile::StringRaw, &[&id, &id]));
        assert!(db.contains(PredicateFile::ArrayType, &["char[]"]));
    }

    #[test]
    fn test_register_method_is_deterministic() {
        let w = writer();
        let m = Method::new("A", "f", vec![], PrimitiveType::Void.into());
        let first = w.register_method(&m).unwrap();
        let second = w.register_method(&m).unwrap();
        assert_eq!(first, second);
        assert_eq!(w.database().count(PredicateFile::Method), 1);
    }

    #[test]
    fn test_long_method_signature_is_hashed() {
        let w = writer();
        let params = (0..80)
            .map(|i| TypeRef::class(format!("com.example.generated.Parameter{i:02}")))
            .collect();
        let m = Method::new("A", "wide", params, PrimitiveType::Void.into());
        let id = w.register_method(&m).unwrap();
        assert!(id.starts_with("<<METHOD HASH:"));
        assert_eq!(id, w.method_id(&m));
        assert_eq!(w.database().lookup(PredicateFile::Method, &id)[0][1], "wide");
    }

    #[test]
    fn test_register_method_with_unresolved_return() {
        let w = writer();
        let m = Method::new("A", "g", vec![], "?T".parse().unwrap());
        assert!(matches!(
            w.register_method(&m),
            Err(EncodeError::InvalidTypeKind { .. })
        ));
        assert_eq!(w.database().count(PredicateFile::Method), 0);
        assert_eq!(w.database().count(PredicateFile::StringRaw), 0);
    }

    #[test]
    fn test_register_method_with_unresolved_param_writes_no_signature() {
        let w = writer();
        let m = Method::new(
            "A",
            "h",
            vec![PrimitiveType::Int.into(), "?Missing".parse().unwrap()],
            PrimitiveType::Void.into(),
        );
        assert!(matches!(
            w.register_method(&m),
            Err(EncodeError::InvalidTypeKind { .. })
        ));
        assert!(w.database().lookup(PredicateFile::StringRaw, &w.method_id(&m)).is_empty());
        assert_eq!(w.database().count(PredicateFile::Method), 0);
    }

    #[test]
    fn test_register_field() {
        let w = writer();
        let f = Field::new("demo.Main", "names", TypeRef::array_of(TypeRef::class("java.lang.String")));
        let id = w.register_field(&f).unwrap();
        assert_eq!(id, "<demo.Main: java.lang.String[] names>");
        assert_eq!(
            w.database().facts(PredicateFile::FieldSignature),
            vec![row(&[&id, "demo.Main", "names", "java.lang.String[]"])]
        );

        w.register_field_modifier(Modifier::Private, &f);
        assert!(w.database().contains(PredicateFile::FieldModifier, &["private", &id]));
    }

    #[test]
    fn test_class_and_interface_markers() {
        let w = writer();
        w.register_class_or_interface(&Class::new("demo.Main"));
        w.register_class_or_interface(&Class::interface("demo.Api"));

        let db = w.database();
        assert!(db.contains(PredicateFile::ClassType, &["demo.Main"]));
        assert!(db.contains(PredicateFile::InterfaceType, &["demo.Api"]));
        assert!(!db.contains(PredicateFile::ClassType, &["demo.Api"]));
        assert!(db.contains(PredicateFile::ClassHeap, &["<class demo.Main>", "demo.Main"]));
        assert!(db.contains(PredicateFile::ClassHeap, &["<class demo.Api>", "demo.Api"]));
    }

    #[test]
    fn test_class_modifier_reemits_kind_marker() {
        let w = writer();
        let api = Class::interface("demo.Api");
        w.register_class_modifier(Modifier::Public, &api);
        w.register_class_modifier(Modifier::Abstract, &api);

        let db = w.database();
        assert_eq!(db.count(PredicateFile::InterfaceType), 1);
        assert!(db.contains(PredicateFile::ClassModifier, &["public", "demo.Api"]));
        assert!(db.contains(PredicateFile::ClassModifier, &["abstract", "demo.Api"]));
    }

    #[test]
    fn test_direct_supertypes_only() {
        let w = writer();
        let class = Class::new("demo.Child");
        w.register_superclass(&class, "demo.Parent");
        w.register_superinterface(&class, "java.lang.Runnable");

        let db = w.database();
        assert_eq!(
            db.facts(PredicateFile::DirectSuperClass),
            vec![row(&["demo.Child", "demo.Parent"])]
        );
        assert_eq!(
            db.facts(PredicateFile::DirectSuperIface),
            vec![row(&["demo.Child", "java.lang.Runnable"])]
        );
    }

    #[test]
    fn test_method_modifier_uses_method_id() {
        let w = writer();
        let m = Method::new("A", "f", vec![], PrimitiveType::Void.into());
        w.register_method_modifier(Modifier::Static, &m);
        assert!(w
            .database()
            .contains(PredicateFile::MethodModifier, &["static", "<A: void f()>"]));
        // модификатор не регистрирует сам метод
        assert_eq!(w.database().count(PredicateFile::Method), 0);
    }

    #[test]
    fn test_application_artifact_and_properties() {
        let w = writer();
        let class = Class::new("demo.Main");
        w.register_application_class(&class);
        w.register_class_artifact("app.jar", &class);
        w.register_property("conf/app.properties", "mode", "fast");

        let db = w.database();
        assert!(db.contains(PredicateFile::AppClass, &["demo.Main"]));
        assert!(db.contains(PredicateFile::ClassArtifact, &["app.jar", "demo.Main"]));
        assert!(db.contains(
            PredicateFile::Properties,
            &["conf/app.properties", "mode", "fast"]
        ));
        assert!(db.contains(PredicateFile::StringConst, &["mode"]));
    }
}
