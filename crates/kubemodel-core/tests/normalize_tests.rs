use kubemodel_core::transform::name_normalizer::{
    DEFAULT_MODULE, class_name, normalize_name, split_schema_name,
};

#[test]
fn test_camel_case_property() {
    let n = normalize_name("terminationGracePeriodSeconds");
    assert_eq!(n.original, "terminationGracePeriodSeconds");
    assert_eq!(n.pascal_case, "TerminationGracePeriodSeconds");
    assert_eq!(n.snake_case, "termination_grace_period_seconds");
    assert_eq!(n.screaming_snake, "TERMINATION_GRACE_PERIOD_SECONDS");
}

#[test]
fn test_dollar_prefixed_property() {
    let n = normalize_name("$ref");
    assert_eq!(n.original, "$ref");
    assert_eq!(n.pascal_case, "Ref");
    assert_eq!(n.snake_case, "ref");
}

#[test]
fn test_dashed_property() {
    let n = normalize_name("x-kubernetes-list-type");
    assert_eq!(n.pascal_case, "XKubernetesListType");
    assert_eq!(n.camel_case, "xKubernetesListType");
}

#[test]
fn test_class_name_keeps_acronyms() {
    let n = class_name("CSIDriverSpec");
    assert_eq!(n.original, "CSIDriverSpec");
    assert_eq!(n.snake_case, "csi_driver_spec");
}

#[test]
fn test_split_core_group() {
    let (namespace, class) = split_schema_name("io.k8s.api.core.v1.Pod");
    assert_eq!(namespace, vec!["io", "k8s", "api", "core", "v1"]);
    assert_eq!(class, "Pod");
}

#[test]
fn test_split_crd_group() {
    let (namespace, class) = split_schema_name("io.cert-manager.acme.v1.Challenge");
    assert_eq!(namespace, vec!["io", "cert-manager", "acme", "v1"]);
    assert_eq!(class, "Challenge");
}

#[test]
fn test_split_undotted_goes_to_default_module() {
    let (namespace, class) = split_schema_name("IntOrString");
    assert_eq!(namespace, vec![DEFAULT_MODULE]);
    assert_eq!(class, "IntOrString");
}
