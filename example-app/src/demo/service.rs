use super::dao::TestDao;
use component_macros::Component;
use ioc_common::Autowired;

#[derive(Debug, Default, Component)]
#[service]
pub struct TestService {
    #[autowired]
    dao: Autowired<TestDao>,
}

impl TestService {
    /// 通过注入的 dao 查询
    pub fn describe(&self, id: u32) -> Option<String> {
        self.dao.get().map(|dao| format!("service -> {}", dao.find(id)))
    }
}
