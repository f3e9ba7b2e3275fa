use component_macros::Component;
use ioc_common::{Autowired, Component as _, MarkerKind, TypeCatalog};

#[derive(Debug, Default, Component)]
#[resource]
struct OkDao;

#[derive(Debug, Default, Component)]
#[service("ok")]
struct OkService {
    #[autowired]
    dao: Autowired<OkDao>,
}

fn main() {
    let descriptor = OkService::descriptor();
    assert_eq!(descriptor.simple_name(), "OkService");
    assert!(descriptor.has_marker(MarkerKind::Service));
    assert_eq!(descriptor.fields.len(), 1);
    assert!(!OkService::default().dao.is_wired());
    assert!(TypeCatalog::global().by_key(&descriptor.key).is_some());
}
