use strata_mapper::{
    ContextInputMappable, ContextOutputMappable, ContextualMapper, ContextualOutMapper,
    InputMappable, Mapper, OutMapper, OutputMappable,
};
use strata_value::{
    MappingError, MappingErrorKind, StructuredValue, Value, key_space, raw_enum, value,
};

key_space! {
    enum PrimitiveKey {
        Int = "int",
        Text = "string",
        Double = "double",
        Flag = "bool",
    }
}

#[derive(Debug, PartialEq)]
struct Primitives {
    int: i64,
    string: String,
    double: f64,
    bool: bool,
}

impl InputMappable for Primitives {
    type Key = PrimitiveKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, PrimitiveKey, S>) -> Result<Self, MappingError> {
        Ok(Primitives {
            int: mapper.map(&[PrimitiveKey::Int])?,
            string: mapper.map(&[PrimitiveKey::Text])?,
            double: mapper.map(&[PrimitiveKey::Double])?,
            bool: mapper.map(&[PrimitiveKey::Flag])?,
        })
    }
}

impl OutputMappable for Primitives {
    type Key = PrimitiveKey;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<PrimitiveKey, S>) -> Result<(), MappingError> {
        mapper.map(&self.int, &[PrimitiveKey::Int])?;
        mapper.map(&self.string, &[PrimitiveKey::Text])?;
        mapper.map(&self.double, &[PrimitiveKey::Double])?;
        mapper.map(&self.bool, &[PrimitiveKey::Flag])
    }
}

key_space! {
    enum NestKey {
        Int = "int",
    }
}

#[derive(Debug, PartialEq)]
struct Nest {
    int: i64,
}

impl InputMappable for Nest {
    type Key = NestKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, NestKey, S>) -> Result<Self, MappingError> {
        Ok(Nest {
            int: mapper.map(&[NestKey::Int])?,
        })
    }
}

impl OutputMappable for Nest {
    type Key = NestKey;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<NestKey, S>) -> Result<(), MappingError> {
        mapper.map(&self.int, &[NestKey::Int])
    }
}

key_space! {
    enum RecordKey {
        Text = "string",
        Ints = "ints",
        Nest = "nest",
    }
}

#[derive(Debug, PartialEq)]
struct Record {
    string: String,
    ints: Vec<i64>,
    nest: Nest,
}

impl InputMappable for Record {
    type Key = RecordKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, RecordKey, S>) -> Result<Self, MappingError> {
        Ok(Record {
            string: mapper.map(&[RecordKey::Text])?,
            ints: mapper.map(&[RecordKey::Ints])?,
            nest: mapper.map(&[RecordKey::Nest])?,
        })
    }
}

impl OutputMappable for Record {
    type Key = RecordKey;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<RecordKey, S>) -> Result<(), MappingError> {
        mapper.map(&self.string, &[RecordKey::Text])?;
        mapper.map(&self.ints, &[RecordKey::Ints])?;
        mapper.map(&self.nest, &[RecordKey::Nest])
    }
}

key_space! {
    enum RioKey {
        Rio = "rio-2016",
    }
}

#[derive(Debug)]
struct Rio {
    #[allow(dead_code)]
    rio: String,
}

impl InputMappable for Rio {
    type Key = RioKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, RioKey, S>) -> Result<Self, MappingError> {
        Ok(Rio {
            rio: mapper.map(&[RioKey::Rio])?,
        })
    }
}

#[derive(Debug)]
struct Nests {
    nests: Vec<Nest>,
}

impl InputMappable for Nests {
    type Key = &'static str;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, &'static str, S>) -> Result<Self, MappingError> {
        Ok(Nests {
            nests: mapper.map(&["nests"])?,
        })
    }
}

impl OutputMappable for Nests {
    type Key = &'static str;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<&'static str, S>) -> Result<(), MappingError> {
        mapper.map(&self.nests, &["nests"])
    }
}

raw_enum! {
    enum Project: String {
        Venice = "venice",
        Annecy = "annecy",
        Quark = "quark",
    }
}

raw_enum! {
    enum Capital: i64 {
        Kharkiv = 1,
        Kiev = 2,
    }
}

key_space! {
    enum EnumKey {
        Project = "next-big-thing",
        City = "city",
        Projects = "zewo-projects",
        Capitals = "ukraine-capitals",
    }
}

#[derive(Debug, PartialEq)]
struct Enums {
    project: Project,
    city: Option<Capital>,
    projects: Vec<Project>,
    capitals: Vec<Capital>,
}

impl InputMappable for Enums {
    type Key = EnumKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, EnumKey, S>) -> Result<Self, MappingError> {
        Ok(Enums {
            project: mapper.map_raw(&[EnumKey::Project])?,
            city: mapper.map_raw_optional(&[EnumKey::City])?,
            projects: mapper.map_raw_array(&[EnumKey::Projects])?,
            capitals: mapper.map_raw_array(&[EnumKey::Capitals])?,
        })
    }
}

impl OutputMappable for Enums {
    type Key = EnumKey;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<EnumKey, S>) -> Result<(), MappingError> {
        mapper.map_raw(&self.project, &[EnumKey::Project])?;
        if let Some(city) = &self.city {
            mapper.map_raw(city, &[EnumKey::City])?;
        }
        mapper.map_raw_array(&self.projects, &[EnumKey::Projects])?;
        mapper.map_raw_array(&self.capitals, &[EnumKey::Capitals])
    }
}

#[derive(Debug, Clone, Copy)]
enum Fruit {
    Apple,
    Peach,
    Orange,
}

impl Fruit {
    fn key(self) -> &'static str {
        match self {
            Fruit::Apple => "apple-int",
            Fruit::Peach => "peach-int",
            Fruit::Orange => "orange-int",
        }
    }
}

#[derive(Debug, PartialEq)]
struct FruitNest {
    int: i64,
}

impl ContextInputMappable for FruitNest {
    type Key = &'static str;
    type Context = Fruit;

    fn from_contextual_mapper<S: StructuredValue>(
        mapper: &ContextualMapper<'_, &'static str, Fruit, S>,
    ) -> Result<Self, MappingError> {
        let int = match mapper.context() {
            Fruit::Apple => mapper.map(&["apple-int"])?,
            Fruit::Peach => mapper.map(&["peach-int"])?,
            Fruit::Orange => mapper.map(&["orange-int"])?,
        };
        Ok(FruitNest { int })
    }
}

impl ContextOutputMappable for FruitNest {
    type Key = &'static str;
    type Context = Fruit;

    fn to_contextual_mapper<S: StructuredValue>(
        &self,
        mapper: &mut ContextualOutMapper<'_, &'static str, Fruit, S>,
    ) -> Result<(), MappingError> {
        let key = mapper.context().key();
        mapper.map(&self.int, &[key])
    }
}

#[derive(Debug, PartialEq)]
struct Basket {
    nest: FruitNest,
    nests: Vec<FruitNest>,
    spare: Option<FruitNest>,
}

impl ContextInputMappable for Basket {
    type Key = &'static str;
    type Context = Fruit;

    fn from_contextual_mapper<S: StructuredValue>(
        mapper: &ContextualMapper<'_, &'static str, Fruit, S>,
    ) -> Result<Self, MappingError> {
        Ok(Basket {
            nest: mapper.map_in_context(&["nest"])?,
            nests: mapper.map_in_context(&["nests"])?,
            spare: mapper.map_optional_in_context(&["spare"])?,
        })
    }
}

impl ContextOutputMappable for Basket {
    type Key = &'static str;
    type Context = Fruit;

    fn to_contextual_mapper<S: StructuredValue>(
        &self,
        mapper: &mut ContextualOutMapper<'_, &'static str, Fruit, S>,
    ) -> Result<(), MappingError> {
        mapper.map_in_context(&self.nest, &["nest"])?;
        mapper.map_in_context(&self.nests, &["nests"])?;
        if let Some(spare) = &self.spare {
            mapper.map_in_context(spare, &["spare"])?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
struct MixedFruit {
    nest: FruitNest,
    nests: Vec<FruitNest>,
}

impl InputMappable for MixedFruit {
    type Key = &'static str;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, &'static str, S>) -> Result<Self, MappingError> {
        Ok(MixedFruit {
            nest: mapper.map_with_context(&["nest"], &Fruit::Peach)?,
            nests: mapper.map_with_context(&["nests"], &Fruit::Orange)?,
        })
    }
}

impl OutputMappable for MixedFruit {
    type Key = &'static str;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<&'static str, S>) -> Result<(), MappingError> {
        mapper.map_with_context(&self.nest, &["nest"], &Fruit::Peach)?;
        mapper.map_with_context(&self.nests, &["nests"], &Fruit::Orange)
    }
}

struct HiddenFar {
    hidden_far: String,
}

impl InputMappable for HiddenFar {
    type Key = &'static str;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, &'static str, S>) -> Result<Self, MappingError> {
        Ok(HiddenFar {
            hidden_far: mapper.map(&["deeper", "stillDeeper", "close", "gotcha"])?,
        })
    }
}

struct FlatNests {
    nests: Vec<Nest>,
}

impl InputMappable for FlatNests {
    type Key = &'static str;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, &'static str, S>) -> Result<Self, MappingError> {
        Ok(FlatNests {
            nests: mapper.map(&[])?,
        })
    }
}

key_space! {
    enum ActionKey {
        Main = "main",
        Rate = "rate",
        TimeInterval = "time-interval",
    }
}

#[derive(Debug, PartialEq)]
enum Action {
    Fire { rate: i64 },
    TakeAim { when: f64 },
}

impl InputMappable for Action {
    type Key = ActionKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, ActionKey, S>) -> Result<Self, MappingError> {
        let main: String = mapper.map(&[ActionKey::Main])?;
        match main.as_str() {
            "fire" => Ok(Action::Fire {
                rate: mapper.map(&[ActionKey::Rate])?,
            }),
            "take-aim" => Ok(Action::TakeAim {
                when: mapper.map(&[ActionKey::TimeInterval])?,
            }),
            other => Err(MappingError::custom(format!("unknown action `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Epoch {
    Unix,
    Reference,
}

const REFERENCE_OFFSET: f64 = 978_307_200.0;

/// Seconds since the Unix epoch.
#[derive(Debug, PartialEq)]
struct Timestamp(f64);

impl ContextInputMappable for Timestamp {
    type Key = &'static str;
    type Context = Epoch;

    fn from_contextual_mapper<S: StructuredValue>(
        mapper: &ContextualMapper<'_, &'static str, Epoch, S>,
    ) -> Result<Self, MappingError> {
        let interval: f64 = mapper.map(&[])?;
        Ok(match mapper.context() {
            Epoch::Unix => Timestamp(interval),
            Epoch::Reference => Timestamp(interval + REFERENCE_OFFSET),
        })
    }
}

impl ContextOutputMappable for Timestamp {
    type Key = &'static str;
    type Context = Epoch;

    fn to_contextual_mapper<S: StructuredValue>(
        &self,
        mapper: &mut ContextualOutMapper<'_, &'static str, Epoch, S>,
    ) -> Result<(), MappingError> {
        let interval = match mapper.context() {
            Epoch::Unix => self.0,
            Epoch::Reference => self.0 - REFERENCE_OFFSET,
        };
        mapper.map(&interval, &[])
    }
}

#[strata_testhelpers::test]
fn primitives_round_trip() {
    let tree = value!({ "int": 15, "double": 32.0, "string": "Hello", "bool": true });
    let test = Primitives::from_tree(&tree).unwrap();
    assert_eq!(
        test,
        Primitives {
            int: 15,
            string: "Hello".into(),
            double: 32.0,
            bool: true
        }
    );
    assert_eq!(test.to_value().unwrap(), tree);
}

#[strata_testhelpers::test]
fn nested_records_round_trip() {
    let tree = value!({ "string": "Rio-2016", "ints": [2, 5, 4], "nest": { "int": 11 } });
    let record = Record::from_tree(&tree).unwrap();
    assert_eq!(record.string, "Rio-2016");
    assert_eq!(record.ints, vec![2, 5, 4]);
    assert_eq!(record.nest, Nest { int: 11 });
    assert_eq!(record.to_value().unwrap(), tree);
}

#[strata_testhelpers::test]
fn missing_required_value() {
    let tree = value!({ "string": "Rio-2016" });
    let err = Rio::from_tree(&tree).unwrap_err();
    assert_eq!(err.kind, MappingErrorKind::ValueNotFound);
    insta::assert_snapshot!(err, @"at .rio-2016: value not found");
}

#[strata_testhelpers::test]
fn wrong_scalar_type() {
    let tree = value!({ "rio-2016": 2016 });
    let err = Rio::from_tree(&tree).unwrap_err();
    assert!(err.is_type_error());
    insta::assert_snapshot!(err, @"at .rio-2016: type mismatch: expected string, got int");
}

#[strata_testhelpers::test]
fn scalar_where_array_expected() {
    let tree = value!({ "string": "Rio-2016", "ints": false, "nest": { "int": 11 } });
    let err = Record::from_tree(&tree).unwrap_err();
    insta::assert_snapshot!(err, @"at .ints: type mismatch: expected array, got bool");
}

#[strata_testhelpers::test]
fn arrays_of_mappables() {
    let nests: Vec<Value> = [3, 1, 4, 6, 19].iter().map(|&i| value!({ "int": i })).collect();
    let tree = value!({ "nests": (Value::Array(nests)) });
    let test = Nests::from_tree(&tree).unwrap();
    let ints: Vec<i64> = test.nests.iter().map(|n| n.int).collect();
    assert_eq!(ints, vec![3, 1, 4, 6, 19]);
    assert_eq!(test.to_value().unwrap(), tree);
}

#[strata_testhelpers::test]
fn nested_failures_carry_the_full_path() {
    let tree = value!({ "nests": [{ "int": 1 }, { "int": 2.5 }] });
    let err = Nests::from_tree(&tree).unwrap_err();
    insta::assert_snapshot!(err, @"at .nests[1].int: type mismatch: expected i64, got double");
}

#[strata_testhelpers::test]
fn raw_value_enums() {
    let tree = value!({
        "next-big-thing": "quark",
        "city": 1,
        "zewo-projects": ["venice", "annecy", "quark"],
        "ukraine-capitals": [1, 2]
    });
    let test = Enums::from_tree(&tree).unwrap();
    assert_eq!(
        test,
        Enums {
            project: Project::Quark,
            city: Some(Capital::Kharkiv),
            projects: vec![Project::Venice, Project::Annecy, Project::Quark],
            capitals: vec![Capital::Kharkiv, Capital::Kiev],
        }
    );
    assert_eq!(test.to_value().unwrap(), tree);
}

#[strata_testhelpers::test]
fn unknown_raw_value() {
    let tree = value!({ "next-big-thing": "swansea", "zewo-projects": [], "ukraine-capitals": [] });
    let err = Enums::from_tree(&tree).unwrap_err();
    assert_eq!(
        err.kind,
        MappingErrorKind::CannotInitializeFromRawValue {
            raw: Value::from("swansea")
        }
    );
    insta::assert_snapshot!(err, @r#"at .next-big-thing: no case matches raw value "swansea""#);

    let tree = value!({ "next-big-thing": "quark", "zewo-projects": [], "ukraine-capitals": [1, 3] });
    let err = Enums::from_tree(&tree).unwrap_err();
    insta::assert_snapshot!(err, @"at .ukraine-capitals[1]: no case matches raw value 3");
}

#[strata_testhelpers::test]
fn context_selects_the_key() {
    for (fruit, tree) in [
        (Fruit::Apple, value!({ "apple-int": 1 })),
        (Fruit::Peach, value!({ "peach-int": 2 })),
        (Fruit::Orange, value!({ "orange-int": 3 })),
    ] {
        let nest = FruitNest::from_tree_with(&tree, &fruit).unwrap();
        assert_eq!(nest.to_tree_with::<Value>(&fruit).unwrap(), tree);
    }

    let err = FruitNest::from_tree_with(&value!({ "apple-int": 1 }), &Fruit::Peach).unwrap_err();
    insta::assert_snapshot!(err, @"at .peach-int: value not found");
}

#[strata_testhelpers::test]
fn context_flows_into_nested_values() {
    let tree = value!({ "nest": { "peach-int": 207 }, "nests": [{ "peach-int": 1 }, { "peach-int": 2 }] });
    let basket = Basket::from_tree_with(&tree, &Fruit::Peach).unwrap();
    assert_eq!(basket.nest, FruitNest { int: 207 });
    assert_eq!(basket.nests.len(), 2);
    assert_eq!(basket.spare, None);
    assert_eq!(basket.to_tree_with::<Value>(&Fruit::Peach).unwrap(), tree);
}

#[strata_testhelpers::test]
fn explicit_context_per_field() {
    let tree = value!({ "nest": { "peach-int": 10 }, "nests": [{ "orange-int": 15 }] });
    let mixed = MixedFruit::from_tree(&tree).unwrap();
    assert_eq!(mixed.nest, FruitNest { int: 10 });
    assert_eq!(mixed.nests, vec![FruitNest { int: 15 }]);
    assert_eq!(mixed.to_value().unwrap(), tree);
}

#[strata_testhelpers::test]
fn deep_paths() {
    let tree = value!({ "deeper": { "stillDeeper": { "close": { "gotcha": "X" } } } });
    let deep = HiddenFar::from_tree(&tree).unwrap();
    assert_eq!(deep.hidden_far, "X");
}

#[strata_testhelpers::test]
fn root_arrays() {
    let tree = value!([{ "int": 15 }, { "int": 21 }]);
    let flat = FlatNests::from_tree(&tree).unwrap();
    assert_eq!(flat.nests, vec![Nest { int: 15 }, Nest { int: 21 }]);
}

#[strata_testhelpers::test]
fn enums_with_associated_values() {
    let fire = Action::from_tree(&value!({ "main": "fire", "rate": 3 })).unwrap();
    assert_eq!(fire, Action::Fire { rate: 3 });

    let aim = Action::from_tree(&value!({ "main": "take-aim", "time-interval": 1.5 })).unwrap();
    assert_eq!(aim, Action::TakeAim { when: 1.5 });

    let err = Action::from_tree(&value!({ "main": "retreat" })).unwrap_err();
    assert!(matches!(err.kind, MappingErrorKind::UserDefined { .. }));
    insta::assert_snapshot!(err, @"unknown action `retreat`");
}

#[strata_testhelpers::test]
fn scalar_roots_with_context() {
    let tree = Value::from(5.0);
    let unix = Timestamp::from_tree_with(&tree, &Epoch::Unix).unwrap();
    assert_eq!(unix, Timestamp(5.0));
    let reference = Timestamp::from_tree_with(&tree, &Epoch::Reference).unwrap();
    assert_eq!(reference, Timestamp(978_307_205.0));

    assert_eq!(reference.to_tree_with::<Value>(&Epoch::Reference).unwrap(), tree);
    assert_eq!(unix.to_tree_with::<Value>(&Epoch::Unix).unwrap(), tree);
}

#[strata_testhelpers::test]
fn writing_onto_an_existing_tree() {
    let existing = value!({ "string": "old", "extra": true, "nest": { "kept": 1 } });
    let record = Record {
        string: "new".into(),
        ints: vec![],
        nest: Nest { int: 4 },
    };
    let tree = record.to_tree_onto(existing).unwrap();
    assert_eq!(
        tree,
        value!({ "string": "new", "extra": true, "ints": [], "nest": { "kept": 1, "int": 4 } })
    );
}

raw_enum! {
    enum Level: u64 {
        Low = 1u64,
        High = 2u64,
    }
}

#[strata_testhelpers::test]
fn unmatched_unsigned_raw_values_keep_their_value() {
    let tree = value!({ "level": 7 });
    let mapper: Mapper<'_, &str> = Mapper::new(&tree);
    let err = mapper.map_raw::<Level>(&["level"]).unwrap_err();
    assert_eq!(
        err.kind,
        MappingErrorKind::CannotInitializeFromRawValue { raw: Value::Int(7) }
    );
    insta::assert_snapshot!(err, @"at .level: no case matches raw value 7");

    let tree = value!({ "level": 2 });
    assert_eq!(Mapper::<&str>::new(&tree).map_raw::<Level>(&["level"]).unwrap(), Level::High);
}
