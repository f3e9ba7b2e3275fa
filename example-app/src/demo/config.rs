use super::dao::TestDao;
use component_macros::{beans, Component};
use std::sync::Arc;

/// 由配置类产生的组件
#[derive(Debug, Component)]
#[ioc(no_default)]
pub struct Widget {
    pub label: String,
    dao: Arc<TestDao>,
}

impl Widget {
    pub fn lookup(&self, id: u32) -> String {
        format!("{}: {}", self.label, self.dao.find(id))
    }
}

/// 配置类，工厂方法执行完毕后从容器中移除
#[derive(Debug, Default, Component)]
#[configuration]
pub struct AppConfig;

#[beans]
impl AppConfig {
    #[bean]
    fn widget(&self, dao: Arc<TestDao>) -> Widget {
        Widget {
            label: "widget".to_string(),
            dao,
        }
    }
}
