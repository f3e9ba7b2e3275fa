use super::service::TestService;
use component_macros::Component;
use ioc_common::Autowired;

#[derive(Debug, Default, Component)]
#[controller("c1")]
pub struct TestController {
    #[autowired]
    service: Autowired<TestService>,
}

impl TestController {
    pub fn handle(&self, id: u32) -> String {
        self.service
            .get()
            .and_then(|service| service.describe(id))
            .unwrap_or_else(|| "service unavailable".to_string())
    }
}

#[derive(Debug, Default, Component)]
#[controller("tc2")]
pub struct Test2Controller {
    #[autowired]
    service: Autowired<TestService>,
}

impl Test2Controller {
    pub fn is_ready(&self) -> bool {
        self.service.is_wired()
    }
}
