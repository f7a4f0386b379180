//! 组件容器的端到端集成测试
//!
//! 覆盖声明-绑定-解析-编辑-回收-持久化的完整生命周期。

use container_abstractions::{
    ComponentRef, FieldInjectable, GraphEditor, InstanceResolver, ManagedComponent, OnExistPolicy,
    ParamDescriptor, ResolvedValue, SetterInjectable,
};
use container_common::{Binding, EditError, InjectionResult, LiteralScope, ResolutionError};
use container_impl::{
    AccessorSurface, AmbientScopeValues, ClassDescriptor, ComponentContainer, MethodDescriptor,
    StaticClassRegistry,
};
use indexmap::IndexMap;
use std::any::Any;
use std::sync::{Arc, Mutex};

/// 记录全部注入的通用测试组件
#[derive(Debug)]
struct Recorder {
    class_name: String,
    ctor_args: Vec<ResolvedValue>,
    fields: Mutex<IndexMap<String, ResolvedValue>>,
    setter_calls: Mutex<Vec<(String, ResolvedValue)>>,
}

impl FieldInjectable for Recorder {
    fn set_field(&self, field: &str, value: ResolvedValue) -> InjectionResult<()> {
        self.fields.lock().unwrap().insert(field.to_string(), value);
        Ok(())
    }
}

impl SetterInjectable for Recorder {
    fn invoke_setter(&self, setter: &str, value: ResolvedValue) -> InjectionResult<()> {
        self.setter_calls
            .lock()
            .unwrap()
            .push((setter.to_string(), value));
        Ok(())
    }
}

impl ManagedComponent for Recorder {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn recorder(instance: &ComponentRef) -> &Recorder {
    instance.as_any().downcast_ref::<Recorder>().unwrap()
}

/// 注册一组演示类的容器：Repository <- CachedRepository，独立的 Mailer
fn new_container() -> ComponentContainer {
    let mut registry = StaticClassRegistry::new();
    registry.register_type(ClassDescriptor::new("Repository"));

    let classes = [
        ("CachedRepository", 0usize),
        ("Mailer", 0),
        ("ReportJob", 2),
    ];
    for (class_name, param_count) in classes {
        let mut descriptor = ClassDescriptor::new(class_name)
            .with_field("title")
            .with_method(MethodDescriptor::new("setPeers", 1, 0));
        if class_name == "CachedRepository" {
            descriptor = descriptor.with_parent("Repository");
        }
        for index in 0..param_count {
            descriptor =
                descriptor.with_constructor_param(ParamDescriptor::required(format!("arg{index}")));
        }
        let owned = class_name.to_string();
        registry.register_class(
            descriptor,
            Arc::new(move |args| {
                Ok(Arc::new(Recorder {
                    class_name: owned.clone(),
                    ctor_args: args,
                    fields: Mutex::new(IndexMap::new()),
                    setter_calls: Mutex::new(Vec::new()),
                }) as ComponentRef)
            }),
        );
    }

    let registry = Arc::new(registry);
    ComponentContainer::new(registry.clone(), registry)
}

fn declare(c: &mut ComponentContainer, name: &str, class: &str, weak: bool) {
    c.declare(name, class, false, OnExistPolicy::Fail, weak)
        .unwrap();
}

#[test]
fn full_lifecycle_declare_bind_resolve() {
    let mut c = new_container();
    declare(&mut c, "repo", "CachedRepository", false);
    declare(&mut c, "job", "ReportJob", false);
    c.bind_constructor_arg("job", 0, Some(Binding::reference("repo")))
        .unwrap();
    c.bind_constructor_arg("job", 1, Some(Binding::literal("hello")))
        .unwrap();
    c.bind_field("job", "title", Some(Binding::literal("日报")))
        .unwrap();

    // 场景 C：先构造 repo，再以 (repo, "hello") 构造 job
    let job = c.get("job").unwrap();
    let repo = c.get("repo").unwrap();
    let job = recorder(&job);
    assert_eq!(job.class_name, "ReportJob");
    assert!(Arc::ptr_eq(job.ctor_args[0].as_object().unwrap(), &repo));
    assert_eq!(job.ctor_args[1].as_literal().unwrap(), "hello");
    assert_eq!(job.fields.lock().unwrap()["title"].as_literal().unwrap(), "日报");
}

#[test]
fn post_resolution_edits_do_not_affect_cached_instances() {
    let mut c = new_container();
    declare(&mut c, "mailer", "Mailer", false);
    c.bind_field("mailer", "title", Some(Binding::literal("一")))
        .unwrap();

    let before = c.get("mailer").unwrap();
    // 已解析定义的后续结构编辑不影响已缓存实例
    c.bind_field("mailer", "title", Some(Binding::literal("二")))
        .unwrap();
    let again = c.get("mailer").unwrap();
    assert!(Arc::ptr_eq(&before, &again));
    assert_eq!(
        recorder(&again).fields.lock().unwrap()["title"]
            .as_literal()
            .unwrap(),
        "一"
    );

    // 整体重载后产生反映新定义的新实例
    let text = c.snapshot_json().unwrap();
    c.load_snapshot_json(&text).unwrap();
    let reloaded = c.get("mailer").unwrap();
    assert!(!Arc::ptr_eq(&before, &reloaded));
    assert_eq!(
        recorder(&reloaded).fields.lock().unwrap()["title"]
            .as_literal()
            .unwrap(),
        "二"
    );
}

#[test]
fn rename_then_resolve_rebinds_references() {
    let mut c = new_container();
    declare(&mut c, "old", "Mailer", false);
    declare(&mut c, "owner", "Mailer", false);
    c.bind_field("owner", "dep", Some(Binding::reference("old")))
        .unwrap();

    c.rename("old", "new").unwrap();
    let owner = c.get("owner").unwrap();
    let renamed = c.get("new").unwrap();
    assert!(Arc::ptr_eq(
        recorder(&owner).fields.lock().unwrap()["dep"]
            .as_object()
            .unwrap(),
        &renamed
    ));
    assert!(matches!(
        c.get("old").unwrap_err(),
        ResolutionError::InstanceNotFound { .. }
    ));
}

#[test]
fn removed_dependency_surfaces_the_full_error_chain() {
    let mut c = new_container();
    declare(&mut c, "owner", "Mailer", false);
    declare(&mut c, "dep", "Mailer", false);
    declare(&mut c, "leaf", "Mailer", false);
    c.bind_field("owner", "dep", Some(Binding::reference("dep")))
        .unwrap();
    c.bind_setter("dep", "setLeaf", Some(Binding::reference("leaf")))
        .unwrap();

    // remove 清理引用，dep 仍可解析
    c.remove("leaf").unwrap();
    assert!(c.owner_components("leaf").is_empty());
    c.get("owner").unwrap();

    // 手工构造悬空引用（快照编辑绕过编辑器）时错误链完整
    let mut broken = new_container();
    declare(&mut broken, "a", "ReportJob", false);
    broken
        .bind_constructor_arg("a", 0, Some(Binding::reference("missing")))
        .unwrap();
    broken
        .bind_constructor_arg("a", 1, Some(Binding::literal(1)))
        .unwrap();
    let err = broken.get("a").unwrap_err();
    assert!(
        matches!(err.root_cause(), ResolutionError::InstanceNotFound { name } if name == "missing")
    );
}

#[test]
fn gc_then_persist_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");

    let mut c = new_container();
    declare(&mut c, "root", "Mailer", false);
    declare(&mut c, "kept", "Mailer", true);
    declare(&mut c, "cycle-a", "Mailer", true);
    declare(&mut c, "cycle-b", "Mailer", true);
    c.declare("ext", "Mailer", true, OnExistPolicy::Fail, false)
        .unwrap();
    c.bind_field("root", "dep", Some(Binding::reference("kept")))
        .unwrap();
    c.bind_field("cycle-a", "peer", Some(Binding::reference("cycle-b")))
        .unwrap();
    c.bind_field("cycle-b", "peer", Some(Binding::reference("cycle-a")))
        .unwrap();

    let mut removed = c.collect_and_write(&path).unwrap();
    removed.sort();
    assert_eq!(removed, vec!["cycle-a", "cycle-b"]);

    let mut fresh = new_container();
    fresh.load_snapshot_file(&path).unwrap();
    assert_eq!(fresh.snapshot(), c.snapshot());
    assert!(fresh.definition("root").is_some());
    assert!(fresh.definition("kept").is_some());
    assert!(fresh.definition("ext").is_none());
    assert!(fresh.definition("cycle-a").is_none());

    // 再次回收是不动点
    assert!(fresh.collect_garbage().is_empty());
}

#[test]
fn ambient_scopes_feed_constructor_and_fields() {
    let scopes = AmbientScopeValues::new()
        .with_constant("smtp.host", "mail.internal")
        .with_request_value("trace.id", "req-1");
    let mut c = new_container().with_scopes(Arc::new(scopes));
    declare(&mut c, "job", "ReportJob", false);
    c.bind_constructor_arg(
        "job",
        0,
        Some(Binding::scoped_literal("smtp.host", LiteralScope::EnvironmentConstant)),
    )
    .unwrap();
    c.bind_constructor_arg(
        "job",
        1,
        Some(Binding::scoped_literal("session.user", LiteralScope::SessionScoped)),
    )
    .unwrap();
    c.bind_field(
        "job",
        "trace",
        Some(Binding::scoped_literal("trace.id", LiteralScope::RequestScoped)),
    )
    .unwrap();

    let job = c.get("job").unwrap();
    let job = recorder(&job);
    assert_eq!(job.ctor_args[0].as_literal().unwrap(), "mail.internal");
    // 缺失的会话键落为 null 而不是报错
    assert!(job.ctor_args[1].is_null());
    assert_eq!(
        job.fields.lock().unwrap()["trace"].as_literal().unwrap(),
        "req-1"
    );
}

#[test]
fn accessor_surface_delegates_to_get() {
    let mut c = new_container();
    declare(&mut c, "user-service", "Mailer", false);
    declare(&mut c, "user.service", "Mailer", false);
    let anon = c.declare_anonymous("Mailer").unwrap();

    let surface = AccessorSurface::generate(c.store());
    assert_eq!(surface.len(), 2);
    assert!(surface.symbols().all(|s| surface.target(s) != Some(anon.as_str())));

    let via_symbol = surface.resolve(&mut c, "get_user_service").unwrap();
    let direct = c.get("user-service").unwrap();
    assert!(Arc::ptr_eq(&via_symbol, &direct));

    let disambiguated = surface.resolve(&mut c, "get_user_service_2").unwrap();
    assert!(Arc::ptr_eq(&disambiguated, &c.get("user.service").unwrap()));

    assert!(matches!(
        surface.resolve(&mut c, "get_ghost"),
        Err(ResolutionError::InstanceNotFound { .. })
    ));
}

#[test]
fn duplicate_then_diverge() {
    let mut c = new_container();
    declare(&mut c, "template", "Mailer", false);
    c.bind_field("template", "title", Some(Binding::literal("模板")))
        .unwrap();
    c.duplicate("template", "clone").unwrap();
    c.bind_field("clone", "title", Some(Binding::literal("副本")))
        .unwrap();

    let template = c.get("template").unwrap();
    let clone = c.get("clone").unwrap();
    assert!(!Arc::ptr_eq(&template, &clone));
    assert_eq!(
        recorder(&template).fields.lock().unwrap()["title"]
            .as_literal()
            .unwrap(),
        "模板"
    );
    assert_eq!(
        recorder(&clone).fields.lock().unwrap()["title"]
            .as_literal()
            .unwrap(),
        "副本"
    );
}

#[test]
fn find_instances_of_type_uses_subtype_relations() {
    let mut c = new_container();
    declare(&mut c, "cached", "CachedRepository", false);
    declare(&mut c, "mailer", "Mailer", false);
    declare(&mut c, "mystery", "UnknownClass", false);

    assert_eq!(c.find_instances_of_type("Repository"), vec!["cached"]);
    assert_eq!(
        c.find_instances_of_type("Mailer"),
        vec!["mailer"]
    );
}

#[test]
fn structural_edit_errors_leave_the_store_intact() {
    let mut c = new_container();
    declare(&mut c, "a", "Mailer", false);
    c.declare("ext", "Mailer", true, OnExistPolicy::Fail, false)
        .unwrap();
    let before = c.store().to_map();

    assert!(matches!(
        c.declare("a", "Mailer", false, OnExistPolicy::Fail, false),
        Err(EditError::DuplicateInstance { .. })
    ));
    assert!(matches!(c.remove("ext"), Err(EditError::ExternalInstanceImmutable { .. })));
    assert!(matches!(c.rename("ext", "moved"), Err(EditError::ExternalInstanceImmutable { .. })));
    assert!(matches!(
        "WRONG_SCOPE".parse::<LiteralScope>(),
        Err(EditError::InvalidBindingScope { .. })
    ));
    assert_eq!(c.store().to_map(), before);
}
